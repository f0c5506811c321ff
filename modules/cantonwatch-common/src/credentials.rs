use std::path::Path;

use crate::error::CantonWatchError;

/// Messaging credentials parsed from the positional-line credentials file.
///
/// The file layout is fixed (1-based line numbers, blank lines in between):
/// line 3 = Twilio account SID, line 5 = Twilio auth token, line 7 =
/// WhatsApp from-number, line 9 = WhatsApp to-number, line 13 = Telegram
/// bot token, line 15 = Telegram chat id.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub whatsapp_from: String,
    pub whatsapp_to: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CantonWatchError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CantonWatchError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self, CantonWatchError> {
        let lines: Vec<&str> = contents.lines().collect();
        let field = |index_1_based: usize, name: &str| -> Result<String, CantonWatchError> {
            lines
                .get(index_1_based - 1)
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .ok_or_else(|| {
                    CantonWatchError::Config(format!(
                        "credentials file is missing {name} on line {index_1_based}"
                    ))
                })
        };

        Ok(Self {
            twilio_account_sid: field(3, "the Twilio account SID")?,
            twilio_auth_token: field(5, "the Twilio auth token")?,
            whatsapp_from: field(7, "the WhatsApp from-number")?,
            whatsapp_to: field(9, "the WhatsApp to-number")?,
            telegram_bot_token: field(13, "the Telegram bot token")?,
            telegram_chat_id: field(15, "the Telegram chat id")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Twilio account SID
#
AC0123456789abcdef
#
token-secret
#
whatsapp:+14155238886
#
whatsapp:+41791234567
#
#
# Telegram
123456:bot-token
#
987654321
";

    #[test]
    fn parses_positional_layout() {
        let creds = Credentials::parse(SAMPLE).unwrap();
        assert_eq!(creds.twilio_account_sid, "AC0123456789abcdef");
        assert_eq!(creds.twilio_auth_token, "token-secret");
        assert_eq!(creds.whatsapp_from, "whatsapp:+14155238886");
        assert_eq!(creds.whatsapp_to, "whatsapp:+41791234567");
        assert_eq!(creds.telegram_bot_token, "123456:bot-token");
        assert_eq!(creds.telegram_chat_id, "987654321");
    }

    #[test]
    fn truncated_file_names_the_missing_field() {
        let err = Credentials::parse("a\nb\nc\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Twilio auth token"), "got: {msg}");
        assert!(msg.contains("line 5"), "got: {msg}");
    }
}
