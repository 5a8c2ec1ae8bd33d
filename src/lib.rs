//! MetroDoc - terminal client for a MetroDocAI notebook backend.
//!
//! Core library providing notebook and source-file management, selection
//! state, and a demo chat interface over the backend REST API.

pub mod api;
pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
