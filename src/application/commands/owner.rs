//! Owner-only administration commands

use async_trait::async_trait;

use super::CommandContext;
use crate::application::errors::CommandError;
use crate::domain::entities::{user_jid, CommandStat};
use crate::domain::traits::{CommandHandler, CommandResult};

pub struct SetPrefix;

#[async_trait]
impl CommandHandler for SetPrefix {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        ctx.require_owner()?;
        let Some(prefix) = ctx.command.arg(0) else {
            return Err(ctx.usage_with(&format!("Prefix saat ini: {}", ctx.prefix())));
        };

        let bot = ctx.bot;
        bot.policy.update(&bot.stores.settings, |p| p.with_prefix(prefix));
        Ok(vec![ctx.reply(format!("Prefix berhasil diubah menjadi: {}", prefix))])
    }
}

pub struct Mode;

#[async_trait]
impl CommandHandler for Mode {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        ctx.require_owner()?;
        let public = match ctx.command.arg(0).map(str::to_lowercase).as_deref() {
            Some("public") => true,
            Some("private") => false,
            _ => {
                let current = if ctx.policy.is_public() { "public" } else { "private" };
                return Err(ctx.usage_with(&format!("Mode saat ini: {}", current)));
            }
        };

        let bot = ctx.bot;
        bot.policy.update(&bot.stores.settings, |p| p.with_public(public));
        let mode = if public { "public" } else { "private" };
        Ok(vec![ctx.reply(format!("Mode berhasil diubah menjadi: {}", mode))])
    }
}

/// Restore prefix, mode and group defaults to the configured values
pub struct ResetSettings;

#[async_trait]
impl CommandHandler for ResetSettings {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        ctx.require_owner()?;
        let bot = ctx.bot;
        bot.stores.reset_settings(&bot.config);
        let policy = bot
            .policy
            .update(&bot.stores.settings, |p| p.with_settings(bot.config.settings.clone()));

        let mode = if policy.is_public() { "public" } else { "private" };
        Ok(vec![ctx.reply(format!(
            "Pengaturan dikembalikan ke default.\nPrefix: {}\nMode: {}",
            policy.prefix(),
            mode
        ))])
    }
}

/// Command usage counters
pub struct Stats;

#[async_trait]
impl CommandHandler for Stats {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        ctx.require_owner()?;
        let stats = &ctx.bot.stores.commands;
        let prefix = ctx.prefix();

        if let Some(name) = ctx.command.arg(0) {
            let name = name.to_lowercase();
            let stat = stats
                .get_stats(&name)
                .ok_or_else(|| CommandError::NotFound(format!("Belum ada statistik untuk {}{}", prefix, name)))?;
            return Ok(vec![ctx.reply(describe(prefix, &name, &stat))]);
        }

        let mut all: Vec<(String, CommandStat)> = stats.get_all_stats().into_iter().collect();
        if all.is_empty() {
            return Ok(vec![ctx.reply("Belum ada command yang digunakan.")]);
        }
        all.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));

        let mut text = String::from("*STATISTIK COMMAND*\n");
        for (i, (name, stat)) in all.iter().enumerate() {
            text.push_str(&format!(
                "\n{}. {}{}: {}x ({} gagal)",
                i + 1,
                prefix,
                name,
                stat.count,
                stat.failed
            ));
        }
        Ok(vec![ctx.reply(text)])
    }
}

fn describe(prefix: &str, name: &str, stat: &CommandStat) -> String {
    format!(
        "*Statistik {}{}*\n\nTotal: {}\nBerhasil: {}\nGagal: {}\nPengguna: {}",
        prefix,
        name,
        stat.count,
        stat.success,
        stat.failed,
        stat.users.len()
    )
}

pub struct Ban;

#[async_trait]
impl CommandHandler for Ban {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        set_banned(ctx, true)
    }
}

pub struct Unban;

#[async_trait]
impl CommandHandler for Unban {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        set_banned(ctx, false)
    }
}

fn set_banned(ctx: &CommandContext<'_>, banned: bool) -> CommandResult {
    ctx.require_owner()?;
    let target = ctx
        .command
        .arg(0)
        .and_then(user_jid)
        .ok_or_else(|| ctx.usage())?;

    let users = &ctx.bot.stores.users;
    let updated = if banned { users.ban(&target) } else { users.unban(&target) };
    if !updated {
        return Err(CommandError::NotFound(format!("Pengguna {} belum terdaftar.", target)));
    }

    tracing::info!("User {} banned={}", target, banned);
    let verb = if banned { "diblokir" } else { "dibuka blokirnya" };
    Ok(vec![ctx.reply(format!("Pengguna {} berhasil {}.", target, verb))])
}
