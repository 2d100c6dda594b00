//! Per-row outcomes and run counters.
//!
//! The status strings are what lands in the results file; downstream
//! spreadsheets filter on them, so they must not change.

use std::fmt;

use assetsync_directory::Collection;

/// A named entity an asset row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Category,
    Model,
    StatusLabel,
    Location,
}

impl EntityKind {
    #[must_use]
    pub fn collection(&self) -> Collection {
        match self {
            Self::User => Collection::Users,
            Self::Category => Collection::Categories,
            Self::Model => Collection::Models,
            Self::StatusLabel => Collection::StatusLabels,
            Self::Location => Collection::Locations,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Category => "category",
            Self::Model => "model",
            Self::StatusLabel => "status",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which run counter a row increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    Created,
    Updated,
    Unchanged,
    Failed,
}

/// Terminal state of one asset row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    Created,
    Updated,
    MissingFields,
    NotFound(EntityKind),
    CreateFailed,
    AssignFailed,
}

impl AssetOutcome {
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Created => "success",
            Self::Updated => "updated",
            Self::MissingFields => "failed - missing fields",
            Self::NotFound(EntityKind::User) => "failed - user not found",
            Self::NotFound(EntityKind::Category) => "failed - category not found",
            Self::NotFound(EntityKind::Model) => "failed - model not found",
            Self::NotFound(EntityKind::StatusLabel) => "failed - status not found",
            Self::NotFound(EntityKind::Location) => "failed - location not found",
            Self::CreateFailed | Self::AssignFailed => "failed",
        }
    }

    #[must_use]
    pub fn tally(&self) -> Tally {
        match self {
            Self::Created => Tally::Created,
            Self::Updated => Tally::Updated,
            _ => Tally::Failed,
        }
    }
}

/// Terminal state of one user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOutcome {
    Created,
    Updated,
    NoChange,
    MissingFields,
    CreateFailed,
    UpdateFailed,
}

impl UserOutcome {
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::NoChange => "no change",
            Self::MissingFields => "failed - missing fields",
            Self::CreateFailed => "create failed",
            Self::UpdateFailed => "update failed",
        }
    }

    #[must_use]
    pub fn tally(&self) -> Tally {
        match self {
            Self::Created => Tally::Created,
            Self::Updated => Tally::Updated,
            Self::NoChange => Tally::Unchanged,
            Self::MissingFields | Self::CreateFailed | Self::UpdateFailed => Tally::Failed,
        }
    }
}

/// Counters for one program run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    /// Rows left as they were (user flow only).
    pub unchanged: usize,
    pub failed: usize,
}

impl RunStats {
    /// Count one processed row.
    pub fn record(&mut self, tally: Tally) {
        self.total += 1;
        match tally {
            Tally::Created => self.created += 1,
            Tally::Updated => self.updated += 1,
            Tally::Unchanged => self.unchanged += 1,
            Tally::Failed => self.failed += 1,
        }
    }
}
