//! Chat commands and input parsing.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands understood by the bot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    /// Report the active backend.
    Start,
    /// List available commands.
    Help,
    /// Select the active backend.
    UseDb,
    /// Create a collection in the active backend.
    CreateCollection,
    /// Insert random vectors into a collection of the active backend.
    InsertVectors,
    /// Abort the pending prompt.
    Cancel,
}

impl Command {
    /// Returns every command in menu order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Returns the command name without the leading slash.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Returns the one-line description shown in the command menu.
    pub fn description(self) -> &'static str {
        match self {
            Self::Start => "Show the active database",
            Self::Help => "List available commands",
            Self::UseDb => "Change the active database",
            Self::CreateCollection => "Create a new collection in the active database",
            Self::InsertVectors => "Add vectors to a collection in the active database",
            Self::Cancel => "Cancel the current operation",
        }
    }

    /// Returns whether the command starts a prompt sequence.
    pub fn starts_prompt(self) -> bool {
        matches!(
            self,
            Self::UseDb | Self::CreateCollection | Self::InsertVectors
        )
    }
}

/// A parsed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A known command.
    Command(Command),
    /// A slash command the bot does not know.
    UnknownCommand(String),
    /// Free text.
    Text(String),
}

impl Input {
    /// Parses message text.
    ///
    /// Commands may be addressed to a bot as `/name@bot`. When `bot_username`
    /// is given, commands addressed to a different bot yield `None`.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let Some(rest) = text.strip_prefix('/') else {
            return Some(Self::Text(text.to_owned()));
        };

        let token = rest.split_whitespace().next().unwrap_or_default();
        let (name, target) = match token.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (token, None),
        };

        if let (Some(target), Some(username)) = (target, bot_username)
            && !target.eq_ignore_ascii_case(username)
        {
            return None;
        }

        Some(match name.parse::<Command>() {
            Ok(command) => Self::Command(command),
            Err(_) => Self::UnknownCommand(name.to_owned()),
        })
    }
}

impl From<Command> for Input {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_text() {
        assert_eq!(
            Input::parse("/use_db", None),
            Some(Input::Command(Command::UseDb))
        );
        assert_eq!(
            Input::parse("/create_collection extra words", None),
            Some(Input::Command(Command::CreateCollection))
        );
        assert_eq!(
            Input::parse("qdrant", None),
            Some(Input::Text("qdrant".into()))
        );
        assert_eq!(
            Input::parse("/frobnicate", None),
            Some(Input::UnknownCommand("frobnicate".into()))
        );
    }

    #[test]
    fn respects_bot_mentions() {
        assert_eq!(
            Input::parse("/cancel@VecBot", Some("vecbot")),
            Some(Input::Command(Command::Cancel))
        );
        assert_eq!(Input::parse("/cancel@other_bot", Some("vecbot")), None);
        assert_eq!(
            Input::parse("/cancel@other_bot", None),
            Some(Input::Command(Command::Cancel))
        );
    }

    #[test]
    fn every_command_round_trips_through_its_name() {
        for command in Command::all() {
            let text = format!("/{}", command.name());
            assert_eq!(Input::parse(&text, None), Some(Input::Command(command)));
            assert!(!command.description().is_empty());
        }
        assert_eq!(Command::all().count(), 6);
    }

    #[test]
    fn only_flow_commands_start_prompts() {
        let flows: Vec<_> = Command::all().filter(|c| c.starts_prompt()).collect();
        assert_eq!(
            flows,
            vec![
                Command::UseDb,
                Command::CreateCollection,
                Command::InsertVectors
            ]
        );
    }
}
