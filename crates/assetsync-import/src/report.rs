//! Results files and the end-of-run summary.
//!
//! One CSV row is written per input row, immediately after that row is
//! processed, and flushed so an interrupted run keeps everything done so far.

use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::asset_import::AssetResult;
use crate::error::ImportResult;
use crate::outcome::RunStats;
use crate::user_import::UserResult;

/// Column order of the asset results file.
pub const ASSET_RESULT_HEADER: [&str; 11] = [
    "asset_tag",
    "name",
    "assigned_to",
    "model_name",
    "category_name",
    "status_label",
    "location_name",
    "serial",
    "asset_id",
    "user_id",
    "status",
];

/// Column order of the user results file.
pub const USER_RESULT_HEADER: [&str; 5] =
    ["user_id", "email", "username", "generated_password", "status"];

/// Serialized form of [`AssetResult`]; field order is the column order.
#[derive(Debug, Serialize)]
pub struct AssetResultRow<'a> {
    asset_tag: &'a str,
    name: &'a str,
    assigned_to: &'a str,
    model_name: &'a str,
    category_name: &'a str,
    status_label: &'a str,
    location_name: &'a str,
    serial: &'a str,
    asset_id: String,
    user_id: String,
    status: &'static str,
}

impl<'a> From<&'a AssetResult> for AssetResultRow<'a> {
    fn from(result: &'a AssetResult) -> Self {
        let row = &result.row;
        Self {
            asset_tag: &row.asset_tag,
            name: &row.name,
            assigned_to: &row.assigned_to,
            model_name: &row.model_name,
            category_name: &row.category_name,
            status_label: &row.status_label,
            location_name: &row.location_name,
            serial: &row.serial,
            asset_id: result
                .asset_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            user_id: result
                .user_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            status: result.outcome.status(),
        }
    }
}

/// Serialized form of [`UserResult`]. Holds the plaintext password.
#[derive(Debug, Serialize)]
pub struct UserResultRow<'a> {
    user_id: &'a str,
    email: &'a str,
    username: &'a str,
    generated_password: &'a str,
    status: &'static str,
}

impl<'a> From<&'a UserResult> for UserResultRow<'a> {
    fn from(result: &'a UserResult) -> Self {
        Self {
            user_id: &result.user_id,
            email: &result.email,
            username: &result.username,
            generated_password: result
                .password
                .as_ref()
                .map(|p| p.expose())
                .unwrap_or_default(),
            status: result.outcome.status(),
        }
    }
}

/// CSV results writer with a fixed header.
pub struct ResultWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ResultWriter<W> {
    /// Write the header and flush it.
    pub fn new(inner: W, header: &[&str]) -> ImportResult<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(header)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    /// Append one row and flush it.
    pub fn write<T: Serialize>(&mut self, row: &T) -> ImportResult<()> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> ImportResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()).into())
    }
}

/// Where a run left its artifacts, for the summary block.
#[derive(Debug, Clone, Default)]
pub struct SummaryPaths {
    pub results: PathBuf,
    pub log: Option<PathBuf>,
}

const RULE: &str = "================================================================================";

/// Log the banner that opens a run.
pub fn log_banner(title: &str) {
    info!("{RULE}");
    info!("{title}");
    info!("{RULE}");
}

/// Log the end-of-run summary.
///
/// The unchanged line only appears when the flow can produce it.
pub fn log_summary(stats: &RunStats, paths: &SummaryPaths, show_unchanged: bool) {
    log_banner("IMPORT SUMMARY");
    info!("Total Processed: {}", stats.total);
    info!("Created:         {}", stats.created);
    info!("Updated:         {}", stats.updated);
    if show_unchanged {
        info!("Unchanged:       {}", stats.unchanged);
    }
    info!("Failed:          {}", stats.failed);
    info!("Results saved to: {}", paths.results.display());
    if let Some(log) = &paths.log {
        info!("Log saved to:     {}", log.display());
    }
    info!("{RULE}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{AssetOutcome, EntityKind, UserOutcome};
    use crate::password::GeneratedPassword;
    use crate::rows::AssetRow;
    use assetsync_directory::EntityId;

    fn written(writer: ResultWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_header_written_without_rows() {
        let writer = ResultWriter::new(Vec::new(), &USER_RESULT_HEADER).unwrap();
        assert_eq!(
            written(writer),
            "user_id,email,username,generated_password,status\n"
        );
    }

    #[test]
    fn test_asset_row_column_order() {
        let result = AssetResult {
            row: AssetRow {
                asset_tag: "A001".to_string(),
                name: "Laptop1".to_string(),
                assigned_to: "jane@co.com".to_string(),
                category_name: "Laptops".to_string(),
                model_name: "Dell5420".to_string(),
                status_label: "Deployed".to_string(),
                location_name: "HQ".to_string(),
                serial: "SN123".to_string(),
            },
            asset_id: None,
            user_id: Some(EntityId::from(7)),
            outcome: AssetOutcome::NotFound(EntityKind::Model),
        };

        let mut writer = ResultWriter::new(Vec::new(), &ASSET_RESULT_HEADER).unwrap();
        writer.write(&AssetResultRow::from(&result)).unwrap();

        let text = written(writer);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "asset_tag,name,assigned_to,model_name,category_name,status_label,location_name,serial,asset_id,user_id,status"
        );
        assert_eq!(
            lines[1],
            "A001,Laptop1,jane@co.com,Dell5420,Laptops,Deployed,HQ,SN123,,7,failed - model not found"
        );
    }

    #[test]
    fn test_user_row_carries_password() {
        let password = GeneratedPassword::generate();
        let result = UserResult {
            user_id: "42".to_string(),
            email: "new@co.com".to_string(),
            username: "new".to_string(),
            password: Some(password.clone()),
            outcome: UserOutcome::Created,
        };

        let mut writer = ResultWriter::new(Vec::new(), &USER_RESULT_HEADER).unwrap();
        writer.write(&UserResultRow::from(&result)).unwrap();

        let text = written(writer);
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "42");
        assert_eq!(&record[3], password.expose());
        assert_eq!(&record[4], "created");
    }
}
