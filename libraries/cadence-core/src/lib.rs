//! Cadence Core
//!
//! Platform-agnostic domain types, traits, and error handling for the Cadence
//! catalog.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Album`, `Track` and their create/update payloads
//! - **Core Traits**: `CatalogStore` (every album/track mutation goes through
//!   it) and `ReleaseSweeper` (the periodic activation job)
//! - **Time**: the `Clock` abstraction used to decide what is released
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{is_released, CreateAlbum};
//! use chrono::{Duration, Utc};
//!
//! let album = CreateAlbum {
//!     title: "Night Drive".to_string(),
//!     cover_url: None,
//!     release_date: Utc::now() - Duration::days(1),
//! };
//!
//! assert!(is_released(album.release_date, Utc::now()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CadenceError, Result};
pub use storage::{CatalogStore, ReleaseSweeper};

#[cfg(feature = "mock")]
pub use storage::{MockCatalogStore, MockReleaseSweeper};

pub use types::{
    is_released, Album, AlbumId, CreateAlbum, CreateTrack, SweepReport, Track, TrackId,
    UpdateAlbum, UpdateTrack,
};
