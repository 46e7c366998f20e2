//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub owner: OwnerConfig,
    pub settings: BotSettings,
    pub group_defaults: GroupDefaults,
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub fanout: FanOutConfig,
    pub messages: Messages,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "SMZ Bot".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Bot WhatsApp untuk toko dan moderasi grup".to_string(),
            author: "SMZ Team".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OwnerConfig {
    pub name: String,
    /// Primary owner number (62xxx)
    pub number: String,
    /// Additional owner numbers
    pub numbers: Vec<String>,
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            name: "SMZ Team".to_string(),
            number: "6283821115236".to_string(),
            numbers: vec!["6283821115236".to_string()],
        }
    }
}

/// Runtime-mutable bot settings. Also the shape persisted under
/// `botSettings` in the settings table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotSettings {
    pub public: bool,
    pub prefix_enabled: bool,
    pub custom_prefix: String,
    pub default_prefix: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            public: true,
            prefix_enabled: true,
            custom_prefix: ".".to_string(),
            default_prefix: "!".to_string(),
        }
    }
}

/// Flags applied to a group when it is first registered
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GroupDefaults {
    pub antilink: bool,
    pub antitoxic: bool,
    pub welcome: bool,
    pub leave: bool,
}

impl Default for GroupDefaults {
    fn default() -> Self {
        Self {
            antilink: false,
            antitoxic: false,
            welcome: true,
            leave: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DatabaseConfig {
    pub directory: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./database"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StoreConfig {
    pub qris_image: String,
    pub payment_instructions: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            qris_image: "https://i.ibb.co/gDJKrJt/qris.jpg".to_string(),
            payment_instructions: vec![
                "1. Scan QRIS diatas dengan aplikasi e-wallet seperti Dana, OVO, GoPay, dll".to_string(),
                "2. Masukkan nominal sesuai keinginan".to_string(),
                "3. Setelah melakukan pembayaran, kirim bukti transfer dengan mengetik .kirimbuktop".to_string(),
                "4. Admin akan memproses deposit Anda segera".to_string(),
            ],
        }
    }
}

/// Limits for broadcast and member-add runs
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FanOutConfig {
    pub deadline_minutes: u64,
    pub progress_every: u32,
    pub max_delay_seconds: u64,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            deadline_minutes: 30,
            progress_every: 5,
            max_delay_seconds: 300,
        }
    }
}

/// Fixed user-visible texts
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Messages {
    pub error: String,
    pub owner_only: String,
    pub admin_only: String,
    pub group_only: String,
    pub not_registered: String,
    pub insufficient_balance: String,
    pub deposit_success: String,
    pub purchase_success: String,
    pub product_not_found: String,
    pub antilink_warning: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            error: "Terjadi kesalahan, coba lagi nanti!".to_string(),
            owner_only: "Perintah ini hanya dapat digunakan oleh owner!".to_string(),
            admin_only: "Perintah ini hanya dapat digunakan oleh admin grup!".to_string(),
            group_only: "Perintah ini hanya dapat digunakan di dalam grup!".to_string(),
            not_registered: "Anda belum terdaftar! Silakan daftar terlebih dahulu dengan mengetik .register".to_string(),
            insufficient_balance: "Saldo Anda tidak cukup untuk melakukan transaksi ini. Silahkan deposit terlebih dahulu!".to_string(),
            deposit_success: "Permintaan deposit Anda telah diterima. Silahkan tunggu konfirmasi dari admin.".to_string(),
            purchase_success: "Pembelian berhasil! Pesanan Anda sedang diproses oleh admin.".to_string(),
            product_not_found: "Produk tidak ditemukan. Silahkan periksa kembali kode produk Anda.".to_string(),
            antilink_warning: "Link terdeteksi! Pesan dari anggota non-admin akan dihapus.".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.settings.custom_prefix = prefix;
        }

        if let Ok(owner) = std::env::var("BOT_OWNER") {
            let number: String = owner.chars().filter(|c| c.is_ascii_digit()).collect();
            if !number.is_empty() {
                config.owner.numbers.push(number.clone());
                config.owner.number = number;
            }
        }

        if let Ok(dir) = std::env::var("BOT_DATA_DIR") {
            config.database.directory = PathBuf::from(dir);
        }

        config
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.number.chars().all(|c| !c.is_ascii_digit()) {
            return Err(ConfigError::InvalidValue("owner.number must contain digits".to_string()));
        }
        if self.fanout.progress_every == 0 {
            return Err(ConfigError::InvalidValue("fanout.progress-every must be positive".to_string()));
        }
        if self.fanout.max_delay_seconds == 0 {
            return Err(ConfigError::InvalidValue("fanout.max-delay-seconds must be positive".to_string()));
        }
        Ok(())
    }
}
