#![cfg(feature = "cli")]

use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};

use rgon_packet::{
    read_packet, write_packet, Packet, AUTH_FAILED_ID, SERVERDATA_AUTH_RESPONSE,
    SERVERDATA_EXECCOMMAND, SERVERDATA_RESPONSE_VALUE,
};

/// Serve one connection that authenticates, then answers each command with
/// the reply produced by `answer`.
fn fake_server<F>(answer: F) -> (String, JoinHandle<Vec<String>>)
where
    F: Fn(&str) -> String + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().expect("listener address").to_string();
    let handle = thread::spawn(move || {
        let (mut conn, _) = listener.accept().expect("server should accept");
        authenticate(&mut conn, true);

        let mut commands = Vec::new();
        while let Ok(exec) = read_packet(&mut conn) {
            assert_eq!(exec.mode(), SERVERDATA_EXECCOMMAND);
            let reply = answer(exec.body());
            let packet = Packet::new(exec.request_id(), SERVERDATA_RESPONSE_VALUE, reply);
            write_packet(&packet, &mut conn).expect("reply should send");
            commands.push(exec.body().to_string());
        }
        commands
    });
    (addr, handle)
}

fn authenticate(conn: &mut TcpStream, accept: bool) {
    let auth = read_packet(conn).expect("auth packet should arrive");
    let id = if accept { auth.request_id() } else { AUTH_FAILED_ID };
    write_packet(&Packet::new(auth.request_id(), SERVERDATA_RESPONSE_VALUE, ""), conn)
        .expect("empty response should send");
    write_packet(&Packet::new(id, SERVERDATA_AUTH_RESPONSE, ""), conn)
        .expect("auth response should send");
}

fn run_rgon(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rgon"))
        .args(["--log-level", "off", "--retries", "1"])
        .args(args)
        .env_remove("RGON_ADDRESS")
        .env_remove("RGON_PASSWORD")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("rgon should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin.as_bytes())
        .expect("stdin should accept input");
    child.wait_with_output().expect("rgon should finish")
}

#[test]
fn shell_prints_each_reply_followed_by_blank_line() {
    let (addr, server) = fake_server(|cmd| format!("ran {cmd}\n"));

    let output = run_rgon(
        &["--address", &addr, "--password", "pw"],
        "status\n\nusers\n",
    );

    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "ran status\n\nran users\n\n"
    );
    assert_eq!(server.join().unwrap(), vec!["status", "users"]);
}

#[test]
fn shell_prompts_for_missing_credentials() {
    let (addr, server) = fake_server(|_| "ok".to_string());

    let output = run_rgon(&[], &format!("{addr}\npw\necho hi\n"));

    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "[address]: [password]: ok\n"
    );
    assert_eq!(server.join().unwrap(), vec!["echo hi"]);
}

#[test]
fn exec_json_reports_reply_summary() {
    let (addr, server) = fake_server(|_| "hostname: test server\n".to_string());

    let output = run_rgon(
        &["--address", &addr, "--password", "pw", "--format", "json", "exec", "status"],
        "",
    );

    assert!(output.status.success(), "{output:?}");
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["command"], "status");
    assert_eq!(value["reply"], "hostname: test server\n");
    assert_eq!(value["packets"], 1);
    assert_eq!(value["reconnected"], false);
    assert_eq!(server.join().unwrap(), vec!["status"]);
}

#[test]
fn rejected_password_exits_with_permission_code() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().unwrap().to_string();
    let server = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        authenticate(&mut conn, false);
        while read_packet(&mut conn).is_ok() {}
    });

    let output = run_rgon(&["--address", &addr, "--password", "wrong"], "status\n");

    assert_eq!(output.status.code(), Some(50));
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad password"));
    assert!(output.stdout.is_empty());
    server.join().unwrap();
}

#[test]
fn unreachable_server_exits_with_transport_code() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let output = run_rgon(&["--address", &addr, "--password", "pw", "exec", "status"], "");

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: connect failed"));
}

#[test]
fn malformed_address_is_usage_error() {
    let output = run_rgon(&["--address", "fe80::1", "--password", "pw"], "");
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_needs_no_server() {
    let output = Command::new(env!("CARGO_BIN_EXE_rgon"))
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("rgon {}", env!("CARGO_PKG_VERSION"))
    );
}
