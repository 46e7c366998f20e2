//! smz-bot - chat bot command dispatcher with JSON-backed domain stores

pub mod domain;
pub mod application;
pub mod infrastructure;
