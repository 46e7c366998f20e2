use chrono::{DateTime, Utc};

/// Suffix of group chat identities
pub const GROUP_SUFFIX: &str = "@g.us";

/// Suffix of personal chat identities
pub const USER_SUFFIX: &str = "@s.whatsapp.net";

/// Reduce an identity (`628...@s.whatsapp.net`, `wa.me/628...`, `+62 8...`)
/// to its digits. Device suffixes (`628...:3@...`) are dropped and a leading
/// mention marker is accepted.
pub fn normalize_number(identity: &str) -> String {
    let identity = identity.trim().trim_start_matches('@');
    let user_part = identity.split('@').next().unwrap_or_default();
    let user_part = user_part.split(':').next().unwrap_or_default();
    user_part.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Personal chat identity for a phone number in any formatting
pub fn user_jid(number: &str) -> Option<String> {
    let digits = normalize_number(number);
    if digits.is_empty() {
        None
    } else {
        Some(format!("{}{}", digits, USER_SUFFIX))
    }
}

/// Whether two identities name the same account. Non-numeric identities
/// only match exactly.
pub fn same_user(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let number = normalize_number(a);
    !number.is_empty() && number == normalize_number(b)
}

/// Inbound chat message as delivered by the transport
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    /// Chat the message arrived in (`remoteJid`)
    pub chat_id: String,
    /// Author inside a group chat
    pub participant: Option<String>,
    pub push_name: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(id: impl Into<String>, chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            chat_id: chat_id.into(),
            participant: None,
            push_name: None,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_participant(mut self, participant: impl Into<String>) -> Self {
        self.participant = Some(participant.into());
        self
    }

    pub fn with_push_name(mut self, name: impl Into<String>) -> Self {
        self.push_name = Some(name.into());
        self
    }

    pub fn is_group(&self) -> bool {
        self.chat_id.ends_with(GROUP_SUFFIX)
    }

    /// Identity of the author: the participant in groups, the chat otherwise
    pub fn sender(&self) -> &str {
        if self.is_group() {
            self.participant.as_deref().unwrap_or(&self.chat_id)
        } else {
            &self.chat_id
        }
    }

    pub fn sender_name(&self) -> &str {
        self.push_name.as_deref().unwrap_or("User")
    }
}

/// Payload of an outbound instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundContent {
    Text(String),
    Image { url: String, caption: String },
    /// Remove a message from the chat
    Delete {
        message_id: String,
        participant: Option<String>,
    },
}

/// One instruction for the messaging gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: String,
    pub content: OutboundContent,
    /// Message id this one replies to
    pub quoted: Option<String>,
    pub mentions: Vec<String>,
}

impl Outbound {
    pub fn text(to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            content: OutboundContent::Text(text.into()),
            quoted: None,
            mentions: Vec::new(),
        }
    }

    /// Quoted text reply in the chat the message came from
    pub fn reply(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self::text(message.chat_id.clone(), text).quoting(message)
    }

    pub fn image(to: impl Into<String>, url: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            content: OutboundContent::Image {
                url: url.into(),
                caption: caption.into(),
            },
            quoted: None,
            mentions: Vec::new(),
        }
    }

    pub fn delete(message: &InboundMessage) -> Self {
        Self {
            to: message.chat_id.clone(),
            content: OutboundContent::Delete {
                message_id: message.id.clone(),
                participant: message.participant.clone(),
            },
            quoted: None,
            mentions: Vec::new(),
        }
    }

    pub fn quoting(mut self, message: &InboundMessage) -> Self {
        self.quoted = Some(message.id.clone());
        self
    }

    pub fn mentioning(mut self, jid: impl Into<String>) -> Self {
        self.mentions.push(jid.into());
        self
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            OutboundContent::Text(text) => Some(text),
            OutboundContent::Image { caption, .. } => Some(caption),
            OutboundContent::Delete { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_user_across_formats() {
        assert!(same_user("628111@s.whatsapp.net", "628111:7@s.whatsapp.net"));
        assert!(same_user("bot@s.whatsapp.net", "bot@s.whatsapp.net"));
        assert!(!same_user("bot@s.whatsapp.net", "other@s.whatsapp.net"));
        assert!(!same_user("628111@s.whatsapp.net", "628222@s.whatsapp.net"));
    }

    #[test]
    fn test_normalize_number_strips_formatting() {
        assert_eq!(normalize_number("wa.me/6281234567890"), "6281234567890");
        assert_eq!(normalize_number("+62 812-3456-7890"), "6281234567890");
        assert_eq!(normalize_number("6281234567890@s.whatsapp.net"), "6281234567890");
        assert_eq!(normalize_number("6281234567890:12@s.whatsapp.net"), "6281234567890");
        assert_eq!(normalize_number("@6281234567890"), "6281234567890");
    }

    #[test]
    fn test_user_jid() {
        assert_eq!(user_jid("0812"), Some("0812@s.whatsapp.net".to_string()));
        assert_eq!(user_jid("abc"), None);
    }

    #[test]
    fn test_sender_depends_on_chat_kind() {
        let direct = InboundMessage::new("1", "628111@s.whatsapp.net", ".ping");
        assert!(!direct.is_group());
        assert_eq!(direct.sender(), "628111@s.whatsapp.net");

        let group = InboundMessage::new("2", "12036@g.us", ".ping").with_participant("628222@s.whatsapp.net");
        assert!(group.is_group());
        assert_eq!(group.sender(), "628222@s.whatsapp.net");
    }
}
