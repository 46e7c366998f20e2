//! Domain traits - Abstractions for infrastructure implementations

pub mod gateway;
pub mod handler;

pub use gateway::{AdminRole, BotInfo, GroupMetadata, MessagingGateway, Participant, ParticipantUpdate};
pub use handler::{CommandHandler, CommandResult};
