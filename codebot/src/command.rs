//! Parsing of slash commands from message text.

use codebot_core::TaskKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Task(TaskKind),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Task(kind) => kind.name(),
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            other => other.parse().ok().map(Command::Task),
        }
    }
}

/// A recognized command together with its argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    /// Argument tokens joined by single spaces. Empty when none were given.
    pub args: String,
}

impl Invocation {
    /// Parses `text` as a command.
    ///
    /// Returns `None` for ordinary messages, unknown commands and commands
    /// addressed to another bot (`/fix@OtherBot`). When `bot_username` is `None`
    /// any addressee is accepted.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let (head, tail) = match rest.find(char::is_whitespace) {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };

        let (name, addressee) = match head.split_once('@') {
            Some((name, addressee)) => (name, Some(addressee)),
            None => (head, None),
        };

        if let (Some(addressee), Some(ours)) = (addressee, bot_username) {
            if !addressee.eq_ignore_ascii_case(ours.trim_start_matches('@')) {
                return None;
            }
        }

        let command = Command::from_name(name)?;
        let args = tail.split_whitespace().collect::<Vec<_>>().join(" ");

        Some(Self { command, args })
    }
}
