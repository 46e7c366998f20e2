//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: JSON table persistence
//! - Adapters: Transport integrations

pub mod config;
pub mod storage;
pub mod adapters;
