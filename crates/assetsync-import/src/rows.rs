//! Input rows and CSV reading.
//!
//! Fields are trimmed by the reader. Every column defaults to empty so a short
//! record still deserializes; emptiness is reported by `missing_fields`.

use serde::Deserialize;
use std::io::Read;

use crate::error::{ImportError, ImportResult};

/// Columns an asset input file must have.
pub const ASSET_COLUMNS: [&str; 8] = [
    "asset_tag",
    "name",
    "assigned_to",
    "category_name",
    "model_name",
    "status_label",
    "location_name",
    "serial",
];

/// Columns a user input file must have.
pub const USER_COLUMNS: [&str; 4] = ["first_name", "last_name", "username", "email"];

/// One hardware record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetRow {
    pub asset_tag: String,
    pub name: String,
    /// Email of the user the asset is assigned to.
    pub assigned_to: String,
    pub category_name: String,
    pub model_name: String,
    pub status_label: String,
    pub location_name: String,
    pub serial: String,
}

impl AssetRow {
    /// Names of required columns that are empty in this row.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let values = [
            &self.asset_tag,
            &self.name,
            &self.assigned_to,
            &self.category_name,
            &self.model_name,
            &self.status_label,
            &self.location_name,
            &self.serial,
        ];
        ASSET_COLUMNS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(column, _)| *column)
            .collect()
    }
}

/// One user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserRow {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

impl UserRow {
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let values = [&self.first_name, &self.last_name, &self.username, &self.email];
        USER_COLUMNS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(column, _)| *column)
            .collect()
    }
}

/// Open a CSV reader and check that every required column is in the header.
pub fn open_reader<R: Read>(input: R, required: &[&str]) -> ImportResult<csv::Reader<R>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?;
    let missing: Vec<&str> = required
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(ImportError::MissingHeaders(missing.join(", ")));
    }

    Ok(reader)
}
