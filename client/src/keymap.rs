//! Operator input to command lines

use motorcontrol_shared::{commands, protocol, strip_line_endings};

/// Key help printed when the client starts
pub const HELP: &str = "\
Keys (press Enter after each):
  w      forward
  s      backward
  a      turn left
  d      turn right
  x      stop (a single space works too)
  q      quit
Anything else is sent to the server as typed, e.g. `setm A 1 0`.";

/// What to do with one line of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send this command line
    Send(String),
    /// Send the quit token, then exit
    Quit,
    /// Nothing to send
    Skip,
}

/// Translate one line typed by the operator
pub fn translate(input: &str) -> Action {
    let input = strip_line_endings(input);
    if input == " " {
        return Action::Send(commands::STOP.to_string());
    }

    let command = match input.trim() {
        "" => return Action::Skip,
        "q" | protocol::QUIT => return Action::Quit,
        "w" => commands::FORWARD,
        "s" => commands::BACK,
        "a" => commands::LEFT,
        "d" => commands::RIGHT,
        "x" => commands::STOP,
        other => other,
    };
    Action::Send(command.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent(input: &str) -> String {
        match translate(input) {
            Action::Send(line) => line,
            other => panic!("expected a command for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(sent("w"), "fwd");
        assert_eq!(sent("s\n"), "back");
        assert_eq!(sent("a"), "left");
        assert_eq!(sent("d\r\n"), "right");
        assert_eq!(sent("x"), "stop");
        assert_eq!(sent(" "), "stop");
    }

    #[test]
    fn test_quit() {
        assert_eq!(translate("q"), Action::Quit);
        assert_eq!(translate("quit\n"), Action::Quit);
    }

    #[test]
    fn test_other_input_is_sent_verbatim() {
        assert_eq!(sent("setm A 1 0"), "setm A 1 0");
        assert_eq!(sent("  seta 1 1\r\n"), "seta 1 1");
        assert_eq!(sent("W"), "W");
    }

    #[test]
    fn test_blank_input_is_skipped() {
        assert_eq!(translate(""), Action::Skip);
        assert_eq!(translate("\r\n"), Action::Skip);
        assert_eq!(translate("   "), Action::Skip);
    }
}
