//! Commands available to everyone

use async_trait::async_trait;
use chrono::Local;

use super::CommandContext;
use crate::domain::entities::Category;
use crate::domain::traits::{CommandHandler, CommandResult};

pub struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        Ok(vec![ctx.reply("Pong!")])
    }
}

/// Menu built from the command table, grouped by category
pub struct Menu;

#[async_trait]
impl CommandHandler for Menu {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let bot = &ctx.bot.config.bot;
        let prefix = ctx.prefix();
        let mode = if ctx.policy.is_public() { "Public" } else { "Private" };

        let mut text = format!(
            "*{} - MENU*\n\n*Info Bot*\nNama: {}\nVersion: {}\nPrefix: {}\nMode: {}\n",
            bot.name, bot.name, bot.version, prefix, mode
        );

        for category in Category::ALL {
            let mut commands = ctx.registry.in_category(category).peekable();
            if commands.peek().is_none() {
                continue;
            }
            text.push_str(&format!("\n*{}*\n", category.title()));
            for cmd in commands {
                text.push_str(&format!(
                    "{}{} - {}\n",
                    prefix,
                    cmd.name,
                    cmd.description.as_deref().unwrap_or("")
                ));
            }
        }

        Ok(vec![ctx.reply(text)])
    }
}

pub struct Info;

#[async_trait]
impl CommandHandler for Info {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let config = &ctx.bot.config;
        let now = Local::now();
        let text = format!(
            "*INFO BOT*\n\nNama: {}\nDibuat dengan: Rust\nVersion: {}\nOwner: {}\nTanggal: {}\nWaktu: {}",
            config.bot.name,
            config.bot.version,
            config.owner.name,
            now.format("%d/%m/%Y"),
            now.format("%H:%M:%S"),
        );
        Ok(vec![ctx.reply(text)])
    }
}

pub struct About;

#[async_trait]
impl CommandHandler for About {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        Ok(vec![ctx.reply(ctx.bot.config.bot.description.clone())])
    }
}

pub struct OwnerInfo;

#[async_trait]
impl CommandHandler for OwnerInfo {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let owner = &ctx.bot.config.owner;
        Ok(vec![ctx.reply(format!(
            "Owner Bot: {}\nNomor: wa.me/{}",
            owner.name, owner.number
        ))])
    }
}

// Media conversion is not handled here
pub struct Sticker;

#[async_trait]
impl CommandHandler for Sticker {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        Ok(vec![ctx.reply(
            "Fitur sticker sedang dalam pengembangan. Silakan coba lagi nanti.",
        )])
    }
}

pub struct Register;

#[async_trait]
impl CommandHandler for Register {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let name = match ctx.command.query() {
            q if q.is_empty() => ctx.message.sender_name().to_string(),
            q => q,
        };

        let users = &ctx.bot.stores.users;
        if !users.register(ctx.sender(), &name) {
            return Ok(vec![ctx.reply("Anda sudah terdaftar.")]);
        }

        tracing::info!("Registered user {} as {}", ctx.sender(), name);
        Ok(vec![ctx.reply(format!("Pendaftaran berhasil! Selamat datang, {}.", name))])
    }
}
