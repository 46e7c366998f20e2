use async_trait::async_trait;
use crate::application::errors::GatewayError;
use crate::domain::entities::{same_user, Outbound};

/// Messaging gateway - abstraction over the chat transport
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Deliver one outbound instruction (text, image or delete)
    async fn send_message(&self, outbound: &Outbound) -> Result<(), GatewayError>;

    async fn group_metadata(&self, group_id: &str) -> Result<GroupMetadata, GatewayError>;

    /// Look up the group behind an invite code without joining it
    async fn invite_info(&self, code: &str) -> Result<Option<GroupMetadata>, GatewayError>;

    /// Join a group through an invite code, returning its id when the code is valid
    async fn join_group_by_invite_code(&self, code: &str) -> Result<Option<String>, GatewayError>;

    async fn leave_group(&self, group_id: &str) -> Result<(), GatewayError>;

    /// Add participants to a group, reporting the outcome per id
    async fn add_participants(&self, group_id: &str, ids: &[String]) -> Result<Vec<ParticipantUpdate>, GatewayError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Group information as reported by the transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMetadata {
    pub id: String,
    pub subject: String,
    pub participants: Vec<Participant>,
}

impl GroupMetadata {
    /// Whether `id` is an admin; device suffixes on `id` are ignored
    pub fn is_admin(&self, id: &str) -> bool {
        self.participants.iter().any(|p| same_user(&p.id, id) && p.is_admin())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.participants.iter().any(|p| same_user(&p.id, id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: String,
    pub admin: Option<AdminRole>,
}

impl Participant {
    pub fn member(id: impl Into<String>) -> Self {
        Self { id: id.into(), admin: None }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self { id: id.into(), admin: Some(AdminRole::Admin) }
    }

    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }
}

/// Outcome of adding one participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantUpdate {
    pub id: String,
    pub ok: bool,
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    /// The bot's own chat identity
    pub id: String,
    pub name: String,
}
