//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Policy: prefix, mode and owner checks
//! - Stores: typed repositories over the JSON tables
//! - Messaging: parsing, moderation and dispatching
//! - Commands: the command handlers
//! - Fan-out: long-running broadcast and member-add runs

pub mod commands;
pub mod context;
pub mod errors;
pub mod fanout;
pub mod messaging;
pub mod policy;
pub mod stores;
