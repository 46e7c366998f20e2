//! Message handling - parsing, moderation and dispatch

pub mod dispatcher;
pub mod moderation;
pub mod parser;

pub use dispatcher::MessageDispatcher;
pub use parser::{MessageParser, ParsedCommand};
