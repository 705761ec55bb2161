// Discord layer - commands, event handlers and the adapters the core needs.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "welcome/mod.rs"]
pub mod welcome;

// Re-export command types for convenience
pub use commands::welcome::{Context, Data, Error};
