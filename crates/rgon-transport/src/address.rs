use crate::error::{Result, TransportError};

/// Port assumed when an address names only a host.
pub const DEFAULT_PORT: u16 = 27015;

/// Append [`DEFAULT_PORT`] to `addr` unless it already carries a port.
///
/// Accepts `host`, `host:port`, `[v6]` and `[v6]:port`. A bare IPv6 literal
/// is ambiguous without brackets and is rejected.
pub fn with_default_port(addr: &str) -> Result<String> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(invalid(addr, "missing host"));
    }

    if let Some(rest) = addr.strip_prefix('[') {
        let Some(close) = rest.find(']') else {
            return Err(invalid(addr, "missing ']' in address"));
        };
        return match &rest[close + 1..] {
            "" => Ok(format!("{addr}:{DEFAULT_PORT}")),
            tail if tail.starts_with(':') && !tail[1..].contains(':') => Ok(addr.to_string()),
            _ => Err(invalid(addr, "unexpected characters after ']'")),
        };
    }

    match addr.matches(':').count() {
        0 => Ok(format!("{addr}:{DEFAULT_PORT}")),
        1 => Ok(addr.to_string()),
        _ => Err(invalid(addr, "too many colons in address")),
    }
}

fn invalid(addr: &str, reason: &'static str) -> TransportError {
    TransportError::InvalidAddress {
        addr: addr.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_port_to_bare_host() {
        assert_eq!(with_default_port("example.org").unwrap(), "example.org:27015");
        assert_eq!(with_default_port("10.0.0.2").unwrap(), "10.0.0.2:27015");
    }

    #[test]
    fn keeps_explicit_port() {
        assert_eq!(with_default_port("example.org:27016").unwrap(), "example.org:27016");
        assert_eq!(with_default_port("[::1]:4000").unwrap(), "[::1]:4000");
    }

    #[test]
    fn bracketed_ipv6_without_port() {
        assert_eq!(with_default_port("[::1]").unwrap(), "[::1]:27015");
    }

    #[test]
    fn rejects_ambiguous_ipv6() {
        let err = with_default_port("fe80::1").unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress { .. }));
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(with_default_port("  ").is_err());
        assert!(with_default_port("[::1").is_err());
        assert!(with_default_port("[::1]x").is_err());
    }
}
