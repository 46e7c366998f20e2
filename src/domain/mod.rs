//! Domain layer - Core business objects and the seams to the outside world
//!
//! This layer contains:
//! - Entities: User, Group, CommandStat, Product, messages, the command table
//! - Traits: Abstractions for the messaging gateway and command handlers

pub mod entities;
pub mod traits;
