//! Reconciliation of CSV rows against the asset-management directory.
//!
//! Two flows share one shape: read rows in file order, resolve names to
//! remote ids, create or update, then write one result row per input row.
//!
//! - [`asset_import`]: hardware rows (user → category → model → status →
//!   location, then create or reassign by exact asset tag).
//! - [`user_import`]: user rows (create with a generated password, update on
//!   drift, or leave alone).
//!
//! Per-row failures never abort a run; they become an outcome in the results
//! file. Only I/O and CSV structure problems surface as [`ImportError`].

pub mod asset_import;
pub mod error;
pub mod outcome;
pub mod password;
pub mod report;
pub mod resolver;
pub mod rows;
pub mod user_import;

pub use asset_import::{AssetImporter, AssetResult};
pub use error::{ImportError, ImportResult};
pub use outcome::{AssetOutcome, EntityKind, RunStats, Tally, UserOutcome};
pub use password::GeneratedPassword;
pub use report::{ResultWriter, SummaryPaths};
pub use resolver::{LookupCache, ResolvedEntities, Unresolved};
pub use rows::{AssetRow, UserRow};
pub use user_import::{UserImporter, UserResult};
