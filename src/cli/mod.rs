//! CLI-specific utilities for nogo-router
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod progress;
pub mod repl;
pub mod view;

pub use progress::RequestSpinner;
