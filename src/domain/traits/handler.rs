use async_trait::async_trait;
use crate::application::commands::CommandContext;
use crate::application::errors::CommandError;
use crate::domain::entities::Outbound;

/// Result of running one command: the replies to deliver, or the reason it failed
pub type CommandResult = Result<Vec<Outbound>, CommandError>;

/// One entry of the command table
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult;
}
