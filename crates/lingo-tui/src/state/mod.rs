// ABOUTME: Configuration for the lingo TUI and CLI.
// ABOUTME: Messages live only in memory; nothing else is persisted.

pub mod config;
