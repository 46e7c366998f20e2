//! Anti-link moderation for group messages

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::context::BotContext;
use crate::application::errors::GatewayError;
use crate::domain::entities::{InboundMessage, Outbound};

static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://\S+|www\.\S+|chat\.whatsapp\.com/\S+|wa\.me/\S+|\b[a-z0-9-]+\.(com|net|org|id|io|me|co|xyz|link|ly)\b)")
        .expect("link pattern is valid")
});

/// Whether `text` contains a URL or chat invite link
pub fn contains_link(text: &str) -> bool {
    LINK_PATTERN.is_match(text)
}

/// Run the anti-link check for a group message.
///
/// Returns the warning and delete instructions when the message must be
/// removed, `None` when processing may continue.
pub async fn check_antilink(bot: &BotContext, message: &InboundMessage) -> Result<Option<Vec<Outbound>>, GatewayError> {
    if !message.is_group() || !bot.stores.groups.antilink_enabled(&message.chat_id) {
        return Ok(None);
    }
    if !contains_link(&message.text) {
        return Ok(None);
    }

    let sender = message.sender();
    let metadata = bot.gateway.group_metadata(&message.chat_id).await?;
    if metadata.is_admin(sender) {
        return Ok(None);
    }

    tracing::info!("[{}] Removing link from {}", message.chat_id, sender);
    let handle = sender.split('@').next().unwrap_or(sender);
    let warning = Outbound::text(
        message.chat_id.clone(),
        format!("@{} {}", handle, bot.config.messages.antilink_warning),
    )
    .mentioning(sender);

    Ok(Some(vec![warning, Outbound::delete(message)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_links() {
        assert!(contains_link("join https://chat.whatsapp.com/AbCdEf123"));
        assert!(contains_link("cek www.tokoku.com ya"));
        assert!(contains_link("chat.whatsapp.com/xyz"));
        assert!(contains_link("HTTP://EXAMPLE.ORG"));
        assert!(contains_link("kunjungi tokoku.id"));
    }

    #[test]
    fn test_plain_text_is_not_a_link() {
        assert!(!contains_link(".antilink on"));
        assert!(!contains_link("harga 30.000 saja"));
        assert!(!contains_link("halo semua"));
    }
}
