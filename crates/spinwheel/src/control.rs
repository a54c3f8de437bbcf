use std::io::Write;
use std::os::unix::net::UnixStream;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const SOCKET_PATH: &str = "/tmp/foodwheel.sock";

/// One line on the control socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ControlCommand {
    Spin,
    Show,
    Hide,
    /// Re-read the config file and reload the catalog.
    Reload,
}

impl ControlCommand {
    /// Surrounding whitespace is ignored; unknown lines yield `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        line.trim().parse().ok()
    }
}

pub fn send_command(command: ControlCommand) -> std::io::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH)?;
    writeln!(stream, "{}", command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_line() {
        assert_eq!(ControlCommand::parse_line("spin\n"), Some(ControlCommand::Spin));
        assert_eq!(ControlCommand::parse_line("  Reload "), Some(ControlCommand::Reload));
        assert_eq!(ControlCommand::parse_line("explode"), None);
        assert_eq!(ControlCommand::parse_line(""), None);
    }

    #[test]
    fn test_commands_survive_the_wire() {
        for command in ControlCommand::iter() {
            let line = format!("{}\n", command);
            assert_eq!(ControlCommand::parse_line(&line), Some(command));
        }
    }
}
