//! Owner fan-out commands. Both start a background run and reply at once;
//! progress and the final report arrive as separate messages.

use async_trait::async_trait;
use std::time::Duration;

use super::CommandContext;
use crate::application::errors::CommandError;
use crate::application::fanout::{parse_invite_code, run_fan_out, FanOutAction, FanOutJob};
use crate::domain::traits::{CommandHandler, CommandResult};

/// Validated `<invite-link> <delay>` prefix shared by both commands
fn invite_and_delay(ctx: &CommandContext<'_>) -> Result<(String, Duration), CommandError> {
    let invite_code = ctx
        .command
        .arg(0)
        .and_then(parse_invite_code)
        .ok_or_else(|| ctx.usage_with("Link grup tidak valid."))?;

    let max = ctx.bot.config.fanout.max_delay_seconds;
    let delay = match ctx.command.arg(1).map(str::parse::<u64>) {
        Some(Ok(secs)) if (1..=max).contains(&secs) => secs,
        _ => return Err(ctx.usage_with(&format!("Jeda harus 1 sampai {} detik.", max))),
    };
    Ok((invite_code, Duration::from_secs(delay)))
}

async fn start(ctx: &CommandContext<'_>, job: FanOutJob) -> CommandResult {
    let bot = ctx.bot;
    let delay = job.delay.as_secs();
    tracing::info!("{} queued a fan-out run via {}", ctx.sender(), job.invite_code);
    bot.tasks
        .spawn(run_fan_out(bot.gateway.clone(), job, bot.fanout_limits()))
        .await;

    Ok(vec![ctx.reply(format!(
        "Proses dimulai dengan jeda {} detik. Laporan akan dikirim setelah selesai.",
        delay
    ))])
}

pub struct Broadcast;

#[async_trait]
impl CommandHandler for Broadcast {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        ctx.require_owner()?;
        let (invite_code, delay) = invite_and_delay(ctx)?;
        let text = ctx.command.rest(2);
        if text.is_empty() {
            return Err(ctx.usage_with("Pesan tidak boleh kosong."));
        }

        let job = FanOutJob {
            invite_code,
            delay,
            action: FanOutAction::Broadcast { text: text.to_string() },
            report_to: ctx.message.chat_id.clone(),
        };
        start(ctx, job).await
    }
}

/// Add the members of another group to the current one
pub struct AddMembersFrom;

#[async_trait]
impl CommandHandler for AddMembersFrom {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        ctx.require_owner()?;
        ctx.require_group()?;
        let (invite_code, delay) = invite_and_delay(ctx)?;

        let job = FanOutJob {
            invite_code,
            delay,
            action: FanOutAction::AddMembers {
                target_group: ctx.message.chat_id.clone(),
            },
            report_to: ctx.message.chat_id.clone(),
        };
        start(ctx, job).await
    }
}
