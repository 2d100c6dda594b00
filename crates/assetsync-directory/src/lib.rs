//! Client for the asset-management REST directory.
//!
//! The directory exposes six collections (users, categories, models, status
//! labels, locations and hardware). Every operation is a single HTTP round
//! trip; callers await them one at a time.
//!
//! The [`Directory`] trait is the seam the import engines depend on.
//! [`HttpDirectory`] is the reqwest-backed implementation; the `testing`
//! feature adds an in-memory double.

pub mod auth;
pub mod client;
pub mod collection;
pub mod directory;
pub mod entity;
pub mod envelope;
pub mod error;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use auth::ApiToken;
pub use client::{DirectoryConfig, HttpDirectory, DEFAULT_TIMEOUT};
pub use collection::{Collection, MatchMode, Query};
pub use directory::Directory;
pub use entity::{EntityId, RemoteEntity};
pub use error::{DirectoryError, DirectoryResult};
