// ABOUTME: Reusable TUI widgets.
// ABOUTME: Currently just the multi-line compose box.

pub mod input;
