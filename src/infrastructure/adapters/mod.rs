//! Transport adapters implementing the messaging gateway

pub mod console;

pub use console::ConsoleAdapter;
