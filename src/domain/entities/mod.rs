//! Domain entities - Core business objects

pub mod command;
pub mod command_stat;
pub mod group;
pub mod message;
pub mod product;
pub mod user;

pub use command::{Category, Command, CommandRegistry};
pub use command_stat::CommandStat;
pub use group::{Group, GroupPatch};
pub use message::{normalize_number, same_user, user_jid, InboundMessage, Outbound, OutboundContent};
pub use product::Product;
pub use user::{User, UserPatch};
