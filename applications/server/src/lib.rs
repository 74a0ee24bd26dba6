//! Cadence Server Library
//!
//! Catalog HTTP server with scheduled release activation.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use jobs::{ReleaseScheduler, ReleaseSchedulerHandle};
pub use state::AppState;
