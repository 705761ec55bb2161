/// Placeholder stored for a guild that hasn't customised its welcome message yet.
pub const DEFAULT_WELCOME_MESSAGE: &str = "default message";

/// Legal notice appended to every welcome message we deliver or display.
pub const BASE_LEGAL_MESSAGE: &str = "This server utilizes KoalaBot. In joining this server, you agree to the Terms & Conditions of \n\
KoalaBot and confirm you have read and understand our Privacy Policy. For legal documents relating to this, please view \n\
the following link: http://legal.koalabot.uk/";

const LEGAL_SEPARATOR: &str = "\r\n";

/// Discord rejects message content longer than this many characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// One row of the welcome message table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeMessageRecord {
    pub guild_id: u64,
    pub message: String,
}

impl WelcomeMessageRecord {
    pub fn new(guild_id: u64, message: impl Into<String>) -> Self {
        Self {
            guild_id,
            message: message.into(),
        }
    }

    pub fn placeholder(guild_id: u64) -> Self {
        Self::new(guild_id, DEFAULT_WELCOME_MESSAGE)
    }

    /// The text a member actually receives.
    pub fn display_message(&self) -> String {
        compose_welcome_message(&self.message)
    }
}

/// Appends the legal notice to a guild's custom message.
pub fn compose_welcome_message(custom: &str) -> String {
    format!("{}{}{}", custom, LEGAL_SEPARATOR, BASE_LEGAL_MESSAGE)
}

/// Returns the custom part of a message that had the legal notice baked in,
/// or `None` if the message is already clean.
pub fn strip_legal_suffix(message: &str) -> Option<String> {
    let stripped = message.trim_end().strip_suffix(BASE_LEGAL_MESSAGE)?;
    Some(stripped.trim_end().to_string())
}

/// Whether `content` can be posted as a single Discord message.
pub fn fits_discord_message(content: &str) -> bool {
    content.chars().count() <= DISCORD_MESSAGE_LIMIT
}

/// Trims a command argument and drops it if nothing is left.
pub fn normalize_new_message(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_message_appends_legal_notice() {
        let record = WelcomeMessageRecord::new(1, "Hi there");
        let display = record.display_message();

        assert!(display.starts_with("Hi there"));
        assert!(display.ends_with(BASE_LEGAL_MESSAGE));
    }

    #[test]
    fn test_legal_notice_keeps_line_breaks() {
        let lines: Vec<&str> = BASE_LEGAL_MESSAGE.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Terms & Conditions of "));
        assert!(lines[1].starts_with("KoalaBot and confirm"));
        assert_eq!(lines[2], "the following link: http://legal.koalabot.uk/");
    }

    #[test]
    fn test_strip_legal_suffix() {
        let composed = compose_welcome_message("Hello");
        assert_eq!(strip_legal_suffix(&composed), Some("Hello".to_string()));

        // Clean messages are left alone
        assert_eq!(strip_legal_suffix("Hello"), None);
    }

    #[test]
    fn test_fits_discord_message_counts_chars() {
        assert!(fits_discord_message(&"a".repeat(DISCORD_MESSAGE_LIMIT)));
        assert!(!fits_discord_message(&"a".repeat(DISCORD_MESSAGE_LIMIT + 1)));
        // Multi-byte characters count once
        assert!(fits_discord_message(&"é".repeat(DISCORD_MESSAGE_LIMIT)));
    }

    #[test]
    fn test_normalize_new_message() {
        assert_eq!(normalize_new_message(None), None);
        assert_eq!(normalize_new_message(Some("   ")), None);
        assert_eq!(
            normalize_new_message(Some("  Welcome aboard! ")),
            Some("Welcome aboard!".to_string())
        );
    }
}
