#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use smz_bot::application::commands::default_registry;
use smz_bot::application::context::BotContext;
use smz_bot::application::errors::GatewayError;
use smz_bot::application::messaging::MessageDispatcher;
use smz_bot::domain::entities::{InboundMessage, Outbound};
use smz_bot::domain::traits::{BotInfo, GroupMetadata, MessagingGateway, Participant, ParticipantUpdate};
use smz_bot::infrastructure::config::Config;

pub const OWNER: &str = "6283821115236@s.whatsapp.net";
pub const USER: &str = "628111222333@s.whatsapp.net";
pub const ADMIN: &str = "628999888777@s.whatsapp.net";
pub const GROUP: &str = "120363000000@g.us";
pub const BOT: &str = "bot@s.whatsapp.net";

/// Gateway that records every outbound instruction
#[derive(Default)]
pub struct RecordingGateway {
    pub sent: Mutex<Vec<Outbound>>,
    pub groups: Mutex<HashMap<String, GroupMetadata>>,
    /// Invite code -> group id
    pub invites: Mutex<HashMap<String, String>>,
    pub left: Mutex<Vec<String>>,
    pub added: Mutex<Vec<String>>,
}

impl RecordingGateway {
    pub fn add_group(&self, id: &str, participants: Vec<Participant>) {
        self.groups.lock().unwrap().insert(
            id.to_string(),
            GroupMetadata {
                id: id.to_string(),
                subject: format!("Grup {}", id),
                participants,
            },
        );
    }

    pub fn add_invite(&self, code: &str, group_id: &str) {
        self.invites.lock().unwrap().insert(code.to_string(), group_id.to_string());
    }

    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, to: &str) -> Vec<Outbound> {
        self.sent().into_iter().filter(|o| o.to == to).collect()
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send_message(&self, outbound: &Outbound) -> Result<(), GatewayError> {
        self.sent.lock().unwrap().push(outbound.clone());
        Ok(())
    }

    async fn group_metadata(&self, group_id: &str) -> Result<GroupMetadata, GatewayError> {
        self.groups
            .lock()
            .unwrap()
            .get(group_id)
            .cloned()
            .ok_or_else(|| GatewayError::Rejected(format!("unknown group {}", group_id)))
    }

    async fn invite_info(&self, code: &str) -> Result<Option<GroupMetadata>, GatewayError> {
        let Some(group_id) = self.invites.lock().unwrap().get(code).cloned() else {
            return Ok(None);
        };
        let metadata = self.groups.lock().unwrap().get(&group_id).cloned();
        Ok(Some(metadata.unwrap_or(GroupMetadata {
            id: group_id,
            ..GroupMetadata::default()
        })))
    }

    /// Joining adds the bot to the recorded participants
    async fn join_group_by_invite_code(&self, code: &str) -> Result<Option<String>, GatewayError> {
        let Some(group_id) = self.invites.lock().unwrap().get(code).cloned() else {
            return Ok(None);
        };
        if let Some(group) = self.groups.lock().unwrap().get_mut(&group_id) {
            if !group.contains(BOT) {
                group.participants.push(Participant::member(BOT));
            }
        }
        Ok(Some(group_id))
    }

    async fn leave_group(&self, group_id: &str) -> Result<(), GatewayError> {
        self.left.lock().unwrap().push(group_id.to_string());
        Ok(())
    }

    async fn add_participants(&self, _group_id: &str, ids: &[String]) -> Result<Vec<ParticipantUpdate>, GatewayError> {
        self.added.lock().unwrap().extend(ids.iter().cloned());
        Ok(ids
            .iter()
            .map(|id| ParticipantUpdate { id: id.clone(), ok: true })
            .collect())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: BOT.to_string(),
            name: "SMZ Bot".to_string(),
        }
    }
}

pub struct Harness {
    _dir: Option<tempfile::TempDir>,
    pub gateway: Arc<RecordingGateway>,
    pub dispatcher: Arc<MessageDispatcher>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(f: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut harness = Self::open(dir.path(), f);
        harness._dir = Some(dir);
        harness
    }

    /// Bot over an existing database directory
    pub fn open(path: &Path, f: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::default();
        config.database.directory = path.to_path_buf();
        f(&mut config);

        let gateway = Arc::new(RecordingGateway::default());
        let bot = Arc::new(BotContext::new(config, gateway.clone()));
        Self {
            _dir: None,
            gateway,
            dispatcher: Arc::new(MessageDispatcher::new(bot, default_registry())),
        }
    }

    pub fn bot(&self) -> &BotContext {
        self.dispatcher.bot()
    }

    /// Private-chat message from `from`
    pub async fn send(&self, from: &str, text: &str) -> Vec<Outbound> {
        let message = InboundMessage::new(uuid::Uuid::new_v4().to_string(), from, text);
        self.dispatcher.dispatch(&message).await
    }

    pub async fn send_in_group(&self, group: &str, from: &str, text: &str) -> Vec<Outbound> {
        let message = InboundMessage::new(uuid::Uuid::new_v4().to_string(), group, text).with_participant(from);
        self.dispatcher.dispatch(&message).await
    }
}

pub fn texts(outbound: &[Outbound]) -> Vec<&str> {
    outbound.iter().filter_map(Outbound::text_content).collect()
}
