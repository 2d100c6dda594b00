//! Shared fixtures for import integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Once;

use assetsync_directory::testing::InMemoryDirectory;
use assetsync_directory::Collection;
use serde_json::json;

static INIT: Once = Once::new();

/// Initialize logging for tests (once). Silent unless `RUST_LOG` is set.
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

pub const ASSET_HEADER: &str =
    "asset_tag,name,assigned_to,category_name,model_name,status_label,location_name,serial";

pub const USER_HEADER: &str = "first_name,last_name,username,email";

/// Directory holding one user and one of each lookup entity.
///
/// Ids: jane@co.com = 7, Laptops = 1, Dell5420 = 2, Deployed = 3, HQ = 4.
pub fn seeded_directory() -> InMemoryDirectory {
    let directory = InMemoryDirectory::new();
    directory.insert(
        Collection::Users,
        json!({"id": 7, "email": "jane@co.com", "username": "jane"}),
    );
    directory.insert(Collection::Categories, json!({"id": 1, "name": "Laptops"}));
    directory.insert(Collection::Models, json!({"id": 2, "name": "Dell5420"}));
    directory.insert(Collection::StatusLabels, json!({"id": 3, "name": "Deployed"}));
    directory.insert(Collection::Locations, json!({"id": 4, "name": "HQ"}));
    directory
}

/// CSV text with the given header and rows.
pub fn csv_text(header: &str, rows: &[&str]) -> String {
    let mut text = String::from(header);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

/// Parsed results file: header plus records.
pub fn read_results(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}
