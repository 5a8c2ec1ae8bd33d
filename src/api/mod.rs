//! HTTP client adapter for the notebook backend.
//!
//! The backend is an external REST service; this module wraps its
//! notebook/source endpoints behind the [`NotebookApi`] trait and
//! translates HTTP status and error bodies into [`ApiError`].

pub mod client;
pub mod error;
pub mod types;

pub use client::{NotebookApi, NotebookClient};
pub use error::{ApiError, Result};

#[cfg(test)]
pub use client::MockNotebookApi;
