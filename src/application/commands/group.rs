//! Group moderation commands

use async_trait::async_trait;

use super::CommandContext;
use crate::application::errors::CommandError;
use crate::domain::entities::GroupPatch;
use crate::domain::traits::{CommandHandler, CommandResult};

/// Toggle link removal for the current group
pub struct AntiLink;

#[async_trait]
impl CommandHandler for AntiLink {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        ctx.require_group()?;

        let chat_id = &ctx.message.chat_id;
        let metadata = ctx.bot.gateway.group_metadata(chat_id).await?;
        if !ctx.is_owner() && !metadata.is_admin(ctx.sender()) {
            return Err(CommandError::PolicyDenied(ctx.messages().admin_only.clone()));
        }

        let groups = &ctx.bot.stores.groups;
        let enabled = match ctx.command.arg(0).map(str::to_lowercase).as_deref() {
            Some("on") => true,
            Some("off") => false,
            _ => {
                let state = if groups.antilink_enabled(chat_id) { "aktif" } else { "nonaktif" };
                return Err(ctx.usage_with(&format!("Antilink saat ini: {}", state)));
            }
        };

        groups.upsert(chat_id, &metadata.subject, GroupPatch::antilink(enabled));
        tracing::info!("[{}] antilink={}", chat_id, enabled);

        let state = if enabled { "diaktifkan" } else { "dinonaktifkan" };
        Ok(vec![ctx.reply(format!("Antilink berhasil {} untuk grup ini.", state))])
    }
}
