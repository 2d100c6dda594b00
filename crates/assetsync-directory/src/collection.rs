//! Collections, queries and match modes.

use std::fmt;

/// A resource collection exposed by the directory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Categories,
    Models,
    StatusLabels,
    Locations,
    Hardware,
}

impl Collection {
    /// URL path segment below the API base URL.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Categories => "categories",
            Self::Models => "models",
            Self::StatusLabels => "statuslabels",
            Self::Locations => "locations",
            Self::Hardware => "hardware",
        }
    }

    /// Whether an update (PATCH) response status counts as success.
    ///
    /// Hardware reassignment only accepts 200; user updates accept the
    /// usual write statuses.
    #[must_use]
    pub fn accepts_update_status(&self, status: u16) -> bool {
        match self {
            Self::Hardware => status == 200,
            Self::Users => matches!(status, 200 | 201 | 202 | 204),
            _ => (200..300).contains(&status),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A server-side filter: one query parameter and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    param: &'static str,
    value: String,
}

impl Query {
    /// Filter users by email (`?email=`).
    pub fn email(value: impl Into<String>) -> Self {
        Self {
            param: "email",
            value: value.into(),
        }
    }

    /// Free-text search (`?search=`). The remote matches fuzzily.
    pub fn search(value: impl Into<String>) -> Self {
        Self {
            param: "search",
            value: value.into(),
        }
    }

    #[must_use]
    pub fn param(&self) -> &'static str {
        self.param
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.param, self.value)
    }
}

/// How `find_exact` compares a row field with the wanted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Byte-for-byte equality with the trimmed wanted value (asset tags).
    Exact,
    /// Case-insensitive equality after trimming (emails).
    IgnoreCase,
}

impl MatchMode {
    #[must_use]
    pub fn matches(&self, candidate: &str, wanted: &str) -> bool {
        let wanted = wanted.trim();
        match self {
            Self::Exact => candidate == wanted,
            Self::IgnoreCase => candidate.trim().to_lowercase() == wanted.to_lowercase(),
        }
    }
}
