//! Command handlers and the default command table

pub mod broadcast;
pub mod general;
pub mod group;
pub mod owner;
pub mod shop;

use std::sync::Arc;

use crate::application::context::BotContext;
use crate::application::errors::CommandError;
use crate::application::messaging::parser::ParsedCommand;
use crate::application::policy::Policy;
use crate::domain::entities::{Category, Command, CommandRegistry, InboundMessage, Outbound};
use crate::infrastructure::config::Messages;

/// Everything a handler sees for one invocation
pub struct CommandContext<'a> {
    pub bot: &'a BotContext,
    pub message: &'a InboundMessage,
    pub command: &'a ParsedCommand,
    /// The table entry being executed
    pub entry: &'a Command,
    pub registry: &'a CommandRegistry,
    /// Policy snapshot taken when the message was gated
    pub policy: Arc<Policy>,
}

impl<'a> CommandContext<'a> {
    pub fn sender(&self) -> &str {
        self.message.sender()
    }

    pub fn prefix(&self) -> &str {
        self.policy.prefix()
    }

    pub fn messages(&self) -> &Messages {
        &self.bot.config.messages
    }

    pub fn is_owner(&self) -> bool {
        self.policy.is_owner(self.sender())
    }

    /// Quoted text reply to the invoking message
    pub fn reply(&self, text: impl Into<String>) -> Outbound {
        Outbound::reply(self.message, text)
    }

    pub fn require_owner(&self) -> Result<(), CommandError> {
        if self.is_owner() {
            Ok(())
        } else {
            Err(CommandError::PolicyDenied(self.messages().owner_only.clone()))
        }
    }

    pub fn require_group(&self) -> Result<(), CommandError> {
        if self.message.is_group() {
            Ok(())
        } else {
            Err(CommandError::PolicyDenied(self.messages().group_only.clone()))
        }
    }

    /// Whether the sender is an admin of the current group
    pub async fn is_group_admin(&self) -> Result<bool, CommandError> {
        let metadata = self.bot.gateway.group_metadata(&self.message.chat_id).await?;
        Ok(metadata.is_admin(self.sender()))
    }

    /// Usage hint for the running command
    pub fn usage(&self) -> CommandError {
        self.usage_with("")
    }

    /// Usage hint preceded by `header`
    pub fn usage_with(&self, header: &str) -> CommandError {
        let mut text = String::new();
        if !header.is_empty() {
            text.push_str(header);
            text.push('\n');
        }
        text.push_str(&format!("Penggunaan: {}{}", self.prefix(), self.entry.name));
        if let Some(usage) = &self.entry.usage {
            text.push(' ');
            text.push_str(usage);
        }
        CommandError::ValidationFailed(text)
    }

    /// Parse a strictly positive integer argument
    pub fn positive_arg(&self, index: usize) -> Result<u64, CommandError> {
        match self.command.arg(index).map(str::parse::<u64>) {
            Some(Ok(value)) if value > 0 => Ok(value),
            _ => Err(self.usage()),
        }
    }
}

/// Build the full command table
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Main
    registry.register(Command::new("ping", general::Ping).with_description("Cek koneksi bot"));
    registry.register(
        Command::new("menu", general::Menu)
            .with_aliases(&["help"])
            .with_description("Menampilkan menu ini"),
    );
    registry.register(Command::new("info", general::Info).with_description("Informasi bot"));
    registry.register(
        Command::new("register", general::Register)
            .with_usage("[nama]")
            .with_description("Daftar sebagai pengguna"),
    );

    // Store
    registry.register(
        Command::new("cekmoney", shop::CheckMoney)
            .in_category(Category::Store)
            .with_description("Cek saldo Anda"),
    );
    registry.register(
        Command::new("listproduk", shop::ListProducts)
            .in_category(Category::Store)
            .with_description("Daftar produk"),
    );
    registry.register(
        Command::new("buyproduk", shop::BuyProduct)
            .in_category(Category::Store)
            .with_usage("<kode>")
            .with_description("Beli produk"),
    );
    registry.register(
        Command::new("deposit", shop::Deposit)
            .in_category(Category::Store)
            .with_description("Cara deposit saldo"),
    );
    registry.register(
        Command::new("kirimbuktop", shop::SendProof)
            .in_category(Category::Store)
            .with_usage("[catatan]")
            .with_description("Kirim bukti deposit ke owner"),
    );

    // Group
    registry.register(
        Command::new("antilink", group::AntiLink)
            .in_category(Category::Group)
            .with_usage("on/off")
            .with_description("Hapus link dari anggota non-admin"),
    );

    // Owner
    registry.register(
        Command::new("setprefix", owner::SetPrefix)
            .in_category(Category::Owner)
            .with_usage("<prefix>")
            .with_description("Ubah prefix bot"),
    );
    registry.register(
        Command::new("mode", owner::Mode)
            .in_category(Category::Owner)
            .with_usage("public/private")
            .with_description("Ubah mode bot"),
    );
    registry.register(
        Command::new("resetsetting", owner::ResetSettings)
            .in_category(Category::Owner)
            .with_description("Kembalikan pengaturan ke default"),
    );
    registry.register(
        Command::new("addmoney", shop::AddMoney)
            .in_category(Category::Owner)
            .with_usage("<nomor> <jumlah>")
            .with_description("Tambah saldo pengguna"),
    );
    registry.register(
        Command::new("addproduk", shop::AddProduct)
            .in_category(Category::Owner)
            .with_usage("<nama> <harga>")
            .with_description("Tambah produk"),
    );
    registry.register(
        Command::new("delproduk", shop::DeleteProduct)
            .in_category(Category::Owner)
            .with_usage("<kode>")
            .with_description("Hapus produk"),
    );
    registry.register(
        Command::new("stats", owner::Stats)
            .in_category(Category::Owner)
            .with_usage("[command]")
            .with_description("Statistik penggunaan command"),
    );
    registry.register(
        Command::new("ban", owner::Ban)
            .in_category(Category::Owner)
            .with_usage("<nomor>")
            .with_description("Blokir pengguna"),
    );
    registry.register(
        Command::new("unban", owner::Unban)
            .in_category(Category::Owner)
            .with_usage("<nomor>")
            .with_description("Buka blokir pengguna"),
    );
    registry.register(
        Command::new("bc", broadcast::Broadcast)
            .in_category(Category::Owner)
            .with_usage("<link grup> <jeda detik> <pesan>")
            .with_description("Kirim pesan ke semua anggota grup"),
    );
    registry.register(
        Command::new("culikmember", broadcast::AddMembersFrom)
            .in_category(Category::Owner)
            .with_usage("<link grup> <jeda detik>")
            .with_description("Tambahkan anggota grup lain ke grup ini"),
    );

    // Tools
    registry.register(
        Command::new("sticker", general::Sticker)
            .in_category(Category::Tools)
            .with_aliases(&["s"])
            .with_description("Buat sticker dari gambar/video"),
    );
    registry.register(
        Command::new("owner", general::OwnerInfo)
            .in_category(Category::Tools)
            .with_description("Info pemilik bot"),
    );

    // Other
    registry.register(
        Command::new("about", general::About)
            .in_category(Category::Other)
            .with_description("Tentang bot ini"),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_command_table() {
        let registry = default_registry();
        for name in [
            "ping", "menu", "help", "info", "about", "owner", "sticker", "s", "setprefix", "mode",
            "addmoney", "addproduk", "delproduk", "cekmoney", "listproduk", "buyproduk", "deposit",
            "kirimbuktop", "antilink", "bc", "culikmember", "register", "stats", "ban", "unban",
        ] {
            assert!(registry.find(name).is_some(), "missing command {}", name);
        }
        assert!(registry.find("unknown").is_none());
        assert_eq!(registry.find("help").map(|c| c.name.as_str()), Some("menu"));
    }

    #[test]
    fn test_every_category_is_listed() {
        let registry = default_registry();
        for category in Category::ALL {
            assert!(registry.in_category(category).next().is_some(), "{:?} is empty", category);
        }
    }
}
