//! Message dispatcher - gates, moderates and routes inbound messages

use std::sync::Arc;

use super::moderation::check_antilink;
use super::parser::{MessageParser, ParsedCommand};
use crate::application::commands::CommandContext;
use crate::application::context::BotContext;
use crate::application::errors::CommandError;
use crate::application::policy::Policy;
use crate::domain::entities::{CommandRegistry, InboundMessage, Outbound};

/// Name of the command exempt from the anti-link pre-check
const ANTILINK_COMMAND: &str = "antilink";

/// Routes each inbound message through the gate, the group moderation
/// pre-check and the command table, then delivers the replies
pub struct MessageDispatcher {
    bot: Arc<BotContext>,
    registry: CommandRegistry,
}

impl MessageDispatcher {
    pub fn new(bot: Arc<BotContext>, registry: CommandRegistry) -> Self {
        Self { bot, registry }
    }

    pub fn bot(&self) -> &Arc<BotContext> {
        &self.bot
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Process one message and deliver its replies through the gateway.
    ///
    /// Returns the outbound instructions in delivery order; empty when the
    /// message was ignored.
    pub async fn dispatch(&self, message: &InboundMessage) -> Vec<Outbound> {
        let outbound = self.handle(message).await;
        for out in &outbound {
            if let Err(e) = self.bot.gateway.send_message(out).await {
                tracing::warn!("[{}] Failed to deliver reply to {}: {}", message.chat_id, out.to, e);
            }
        }
        outbound
    }

    /// Compute the replies for one message without delivering them
    pub async fn handle(&self, message: &InboundMessage) -> Vec<Outbound> {
        let policy = self.bot.policy.snapshot();
        let Some(command) = MessageParser::parse(policy.prefix(), &message.text) else {
            return Vec::new();
        };

        let sender = message.sender();
        let is_owner = policy.is_owner(sender);
        if !policy.is_public() && !is_owner {
            tracing::debug!("[{}] Private mode, ignoring {}", message.chat_id, sender);
            return vec![Outbound::reply(message, self.bot.config.messages.owner_only.clone())];
        }
        if command.name.is_empty() {
            return Vec::new();
        }
        if !is_owner && self.bot.stores.users.is_banned(sender) {
            tracing::debug!("[{}] Dropping command from banned user {}", message.chat_id, sender);
            return Vec::new();
        }

        tracing::info!("[{}] {} -> {}{}", message.chat_id, sender, policy.prefix(), command.name);

        if message.is_group() && command.name != ANTILINK_COMMAND {
            match check_antilink(&self.bot, message).await {
                Ok(None) => {}
                Ok(Some(moderation)) => {
                    self.log_command(&command.name, sender, false);
                    return moderation;
                }
                Err(e) => {
                    tracing::warn!("[{}] Anti-link check failed: {}", message.chat_id, e);
                    return vec![Outbound::reply(message, self.bot.config.messages.error.clone())];
                }
            }
        }

        self.route(message, &command, policy).await
    }

    async fn route(&self, message: &InboundMessage, command: &ParsedCommand, policy: Arc<Policy>) -> Vec<Outbound> {
        let Some(entry) = self.registry.find(&command.name) else {
            self.log_command(&command.name, message.sender(), false);
            let prefix = policy.prefix();
            return vec![Outbound::reply(
                message,
                format!(
                    "Command *{}{}* tidak dikenali. Ketik *{}menu* untuk melihat daftar perintah.",
                    prefix, command.name, prefix
                ),
            )];
        };

        let ctx = CommandContext {
            bot: &self.bot,
            message,
            command,
            entry,
            registry: &self.registry,
            policy,
        };
        let result = entry.handler.execute(&ctx).await;
        self.log_command(&entry.name, message.sender(), result.is_ok());

        if !self.bot.stores.healthy() {
            tracing::warn!("One or more tables failed to persist; serving from memory");
        }

        match result {
            Ok(outbound) => outbound,
            Err(e) => vec![Outbound::reply(message, self.error_text(&entry.name, &e))],
        }
    }

    fn error_text(&self, command: &str, error: &CommandError) -> String {
        match error {
            CommandError::Gateway(_) | CommandError::Store(_) => {
                tracing::warn!("Command {} failed ({}): {}", command, error.kind(), error);
                self.bot.config.messages.error.clone()
            }
            _ => {
                tracing::debug!("Command {} rejected ({})", command, error.kind());
                error.to_string()
            }
        }
    }

    fn log_command(&self, command: &str, user_id: &str, success: bool) {
        if let Err(e) = self.bot.stores.commands.log_command(command, user_id, success) {
            tracing::warn!("Failed to record usage of {}: {}", command, e);
        }
    }
}
