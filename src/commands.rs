//! Built-in bot commands and static replies — no translation call.

use hiika_core::language::Language;

/// Reply to `/start`.
pub const GREETING: &str = "Hello! I am a translation bot. Add me to your group or channel, \
     and I will automatically translate Amharic messages to Afan Oromo and vice versa.";

/// Sent when the bot joins a group or channel.
pub const BOT_ADDED_MESSAGE: &str =
    "Thanks for adding me! I will translate Amharic messages to Afan Oromo and vice versa.";

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
}

impl Command {
    /// Parse a command from message text. Returns `None` for anything else,
    /// including unknown `/` prefixes.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/start@hiika_bot" → "/start").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }

    pub fn reply(&self) -> String {
        match self {
            Self::Start => GREETING.to_string(),
            Self::Help => {
                let langs = Language::ALL
                    .iter()
                    .map(|l| format!("{} ({})", l.display_name(), l.code()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "Send a message in {langs} and I will reply with the other two translations."
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("  /start now"), Some(Command::Start));
    }

    #[test]
    fn test_parse_strips_bot_suffix() {
        assert_eq!(Command::parse("/start@hiika_bot"), Some(Command::Start));
        assert_eq!(Command::parse("/help@hiika_bot extra"), Some(Command::Help));
    }

    #[test]
    fn test_parse_rejects_other_text() {
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse("start"), None);
        assert_eq!(Command::parse("Hello /start"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_start_reply_is_greeting() {
        assert_eq!(Command::Start.reply(), GREETING);
        assert!(GREETING.contains("Add me to your group or channel"));
    }

    #[test]
    fn test_help_lists_all_languages() {
        let help = Command::Help.reply();
        assert!(help.contains("Amharic (am)"));
        assert!(help.contains("Afan Oromo (om)"));
        assert!(help.contains("English (en)"));
    }
}
