//! Console command line splitting.
//!
//! A console line holds `;`-separated statements, each a variable or command
//! name followed by an argument. Double quotes group text (including `;` and
//! whitespace) and are stripped. The session only uses this to notice a
//! statement that changes the RCON password.

/// Console variable holding the server's RCON password.
pub const PASSWORD_VARIABLE: &str = "rcon_password";

/// One statement of a console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleCommand {
    /// Command or variable name.
    pub var: String,
    /// Everything after the name, quotes removed.
    pub arg: String,
}

impl ConsoleCommand {
    pub fn new(var: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            arg: arg.into(),
        }
    }
}

/// Split a line such as `say "hello";rcon_password farm` into statements.
///
/// Statements with no name (empty or trailing `;`) are dropped. An
/// unterminated quote runs to the end of the line.
pub fn parse_console_commands(input: &str) -> Vec<ConsoleCommand> {
    let mut splitter = Splitter::default();
    for c in input.chars() {
        splitter.feed(c);
    }
    splitter.end_statement();
    splitter.commands
}

/// The new password if `line` sets [`PASSWORD_VARIABLE`] to a non-empty value.
///
/// When several statements set it, the last one wins.
pub fn changed_password(line: &str) -> Option<String> {
    parse_console_commands(line)
        .into_iter()
        .rev()
        .find(|cmd| cmd.var == PASSWORD_VARIABLE && !cmd.arg.is_empty())
        .map(|cmd| cmd.arg)
}

#[derive(Default)]
struct Splitter {
    commands: Vec<ConsoleCommand>,
    var: String,
    arg: String,
    /// Unquoted whitespace seen inside the argument, kept only if more text follows.
    pending: String,
    in_arg: bool,
    quoted: bool,
}

impl Splitter {
    fn feed(&mut self, c: char) {
        match c {
            '"' => self.quoted = !self.quoted,
            c if self.quoted => self.push(c),
            ';' => self.end_statement(),
            ' ' | '\t' => {
                if self.in_arg {
                    if !self.arg.is_empty() {
                        self.pending.push(c);
                    }
                } else if !self.var.is_empty() {
                    self.in_arg = true;
                }
            }
            c => self.push(c),
        }
    }

    fn push(&mut self, c: char) {
        if self.in_arg {
            self.arg.push_str(&self.pending);
            self.pending.clear();
            self.arg.push(c);
        } else {
            self.var.push(c);
        }
    }

    fn end_statement(&mut self) {
        let var = std::mem::take(&mut self.var);
        let arg = std::mem::take(&mut self.arg);
        self.pending.clear();
        self.in_arg = false;
        self.quoted = false;
        if !var.is_empty() {
            self.commands.push(ConsoleCommand { var, arg });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_separator_stays_in_argument() {
        assert_eq!(
            parse_console_commands("say \"a;b\" ;rcon_password newpass"),
            vec![
                ConsoleCommand::new("say", "a;b"),
                ConsoleCommand::new("rcon_password", "newpass"),
            ]
        );
    }

    #[test]
    fn quotes_are_stripped() {
        assert_eq!(
            parse_console_commands("say \"hello\";rcon_password farm"),
            vec![
                ConsoleCommand::new("say", "hello"),
                ConsoleCommand::new("rcon_password", "farm"),
            ]
        );
    }

    #[test]
    fn inner_whitespace_preserved() {
        assert_eq!(
            parse_console_commands("  say\thello   big world  "),
            vec![ConsoleCommand::new("say", "hello   big world")]
        );
    }

    #[test]
    fn bare_command_has_empty_argument() {
        assert_eq!(
            parse_console_commands("status"),
            vec![ConsoleCommand::new("status", "")]
        );
    }

    #[test]
    fn empty_statements_are_absent() {
        assert!(parse_console_commands("").is_empty());
        assert!(parse_console_commands(" ; ;").is_empty());
        assert_eq!(
            parse_console_commands("status;"),
            vec![ConsoleCommand::new("status", "")]
        );
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(
            parse_console_commands("rcon_password \"new pass;x"),
            vec![ConsoleCommand::new("rcon_password", "new pass;x")]
        );
    }

    #[test]
    fn detects_password_change() {
        assert_eq!(
            changed_password("echo hi; rcon_password secret"),
            Some("secret".to_string())
        );
        assert_eq!(
            changed_password("rcon_password one;rcon_password two"),
            Some("two".to_string())
        );
    }

    #[test]
    fn ignores_non_password_lines() {
        assert_eq!(changed_password("status"), None);
        assert_eq!(changed_password("say rcon_password x"), None);
        assert_eq!(changed_password("echo \"rcon_password x\""), None);
    }

    #[test]
    fn empty_password_is_not_a_change() {
        assert_eq!(changed_password("rcon_password"), None);
        assert_eq!(changed_password("rcon_password \"\""), None);
    }
}
