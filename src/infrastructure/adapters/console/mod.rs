//! Console adapter for development/testing
//!
//! Prints outbound instructions to stdout. Group operations are not
//! available without a real transport.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::application::errors::GatewayError;
use crate::domain::entities::message::{GROUP_SUFFIX, USER_SUFFIX};
use crate::domain::entities::{InboundMessage, Outbound, OutboundContent};
use crate::domain::traits::{BotInfo, GroupMetadata, MessagingGateway, ParticipantUpdate};

/// Console gateway for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: BotInfo {
                id: format!("console{}", USER_SUFFIX),
                name: name.into(),
            },
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new("console")
    }
}

#[async_trait]
impl MessagingGateway for ConsoleAdapter {
    async fn send_message(&self, outbound: &Outbound) -> Result<(), GatewayError> {
        match &outbound.content {
            OutboundContent::Text(text) => println!("[BOT -> {}] {}", outbound.to, text),
            OutboundContent::Image { url, caption } => {
                println!("[BOT -> {}] [image {}] {}", outbound.to, url, caption)
            }
            OutboundContent::Delete { message_id, .. } => {
                println!("[BOT -> {}] [delete {}]", outbound.to, message_id)
            }
        }
        Ok(())
    }

    async fn group_metadata(&self, group_id: &str) -> Result<GroupMetadata, GatewayError> {
        Err(GatewayError::Unsupported(format!("group metadata for {}", group_id)))
    }

    async fn invite_info(&self, _code: &str) -> Result<Option<GroupMetadata>, GatewayError> {
        Err(GatewayError::Unsupported("invite lookup".to_string()))
    }

    async fn join_group_by_invite_code(&self, _code: &str) -> Result<Option<String>, GatewayError> {
        Err(GatewayError::Unsupported("joining groups".to_string()))
    }

    async fn leave_group(&self, group_id: &str) -> Result<(), GatewayError> {
        Err(GatewayError::Unsupported(format!("leaving {}", group_id)))
    }

    async fn add_participants(&self, group_id: &str, _ids: &[String]) -> Result<Vec<ParticipantUpdate>, GatewayError> {
        Err(GatewayError::Unsupported(format!("adding participants to {}", group_id)))
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Reads inbound messages from stdin, one per line.
///
/// Line format: `<sender> <text>` for a private chat or
/// `<group>/<sender> <text>` for a group chat. Bare numbers are expanded to
/// full identities.
pub struct ConsoleInput {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleInput {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next parsed message; `None` at end of input
    pub async fn next_message(&mut self) -> Option<InboundMessage> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!("Failed to read stdin: {}", e);
                    return None;
                }
            };
            match parse_line(&line) {
                Some(message) => return Some(message),
                None if line.trim().is_empty() => continue,
                None => eprintln!("Format: <nomor> <pesan> atau <grup>/<nomor> <pesan>"),
            }
        }
    }
}

/// Parse one console line into an inbound message
pub fn parse_line(line: &str) -> Option<InboundMessage> {
    let line = line.trim();
    let (address, text) = line.split_once(char::is_whitespace)?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let id = uuid::Uuid::new_v4().to_string();
    let message = match address.split_once('/') {
        Some((group, sender)) => {
            InboundMessage::new(id, qualify(group, GROUP_SUFFIX), text).with_participant(qualify(sender, USER_SUFFIX))
        }
        None => InboundMessage::new(id, qualify(address, USER_SUFFIX), text),
    };
    Some(message)
}

fn qualify(address: &str, suffix: &str) -> String {
    if address.contains('@') {
        address.to_string()
    } else {
        format!("{}{}", address, suffix)
    }
}
