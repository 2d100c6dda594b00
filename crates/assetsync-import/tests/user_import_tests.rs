//! End-to-end user runs against the in-memory directory.

mod common;

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use assetsync_directory::testing::{InMemoryDirectory, Operation};
use assetsync_directory::Collection;
use assetsync_import::password::{PASSWORD_ALPHABET, PASSWORD_LENGTH};
use assetsync_import::{RunStats, UserImporter};
use common::{csv_text, init_test_logging, read_results, USER_HEADER};
use serde_json::{json, Value};
use tempfile::TempDir;

const ROWS: [&str; 3] = [
    "Jane,Doe,jdoe,jane@co.com",
    "John,Roe,jroe,john@co.com",
    "Ann,Lee,alee,ann@co.com",
];

async fn run(directory: &InMemoryDirectory, input: &str, output: &Path) -> RunStats {
    init_test_logging();
    UserImporter::new(directory)
        .run(input.as_bytes(), File::create(output).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_first_run_creates_with_distinct_passwords() {
    let directory = InMemoryDirectory::new();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("generated_passwords.csv");

    let stats = run(&directory, &csv_text(USER_HEADER, &ROWS), &output).await;

    assert_eq!(stats.created, 3);
    let (header, records) = read_results(&output);
    assert_eq!(
        header,
        ["user_id", "email", "username", "generated_password", "status"]
    );

    let passwords: HashSet<&str> = records.iter().map(|r| r[3].as_str()).collect();
    assert_eq!(passwords.len(), 3);
    for password in &passwords {
        assert_eq!(password.len(), PASSWORD_LENGTH);
        assert!(password.bytes().all(|b| PASSWORD_ALPHABET.contains(&b)));
    }
    assert!(records.iter().all(|r| r[4] == "created" && !r[0].is_empty()));
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let directory = InMemoryDirectory::new();
    let dir = TempDir::new().unwrap();
    let input = csv_text(USER_HEADER, &ROWS);

    run(&directory, &input, &dir.path().join("first.csv")).await;
    directory.clear_calls();

    let second = dir.path().join("second.csv");
    let stats = run(&directory, &input, &second).await;

    assert_eq!(
        stats,
        RunStats {
            total: 3,
            unchanged: 3,
            ..RunStats::default()
        }
    );
    assert_eq!(directory.write_count(), 0);
    let (_, records) = read_results(&second);
    assert!(records.iter().all(|r| r[3].is_empty() && r[4] == "no change"));
}

#[tokio::test]
async fn test_single_field_change_sends_one_full_update() {
    let directory = InMemoryDirectory::new();
    let id = directory.insert(
        Collection::Users,
        json!({
            "first_name": "Jane", "last_name": "Doe",
            "username": "jdoe", "email": "jane@co.com"
        }),
    );
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let stats = run(
        &directory,
        &csv_text(USER_HEADER, &["Jane,Smith,jdoe,jane@co.com"]),
        &output,
    )
    .await;

    assert_eq!(stats.updated, 1);
    assert_eq!(directory.count(Operation::Update, Collection::Users), 1);
    let update = directory
        .calls()
        .into_iter()
        .find(|c| c.operation == Operation::Update)
        .unwrap();
    assert_eq!(update.id, Some(id.clone()));
    assert_eq!(
        update.payload,
        Some(json!({
            "first_name": "Jane", "last_name": "Smith",
            "username": "jdoe", "email": "jane@co.com"
        }))
    );

    let (_, records) = read_results(&output);
    assert_eq!(records[0], [id.to_string().as_str(), "jane@co.com", "jdoe", "", "updated"]);
}

#[tokio::test]
async fn test_email_case_difference_is_not_a_change() {
    let directory = InMemoryDirectory::new();
    directory.insert(
        Collection::Users,
        json!({
            "first_name": "Jane", "last_name": "Doe",
            "username": "JDoe", "email": "Jane@Co.com"
        }),
    );
    let dir = TempDir::new().unwrap();

    let stats = run(
        &directory,
        &csv_text(USER_HEADER, &["Jane,Doe,jdoe,jane@co.com"]),
        &dir.path().join("out.csv"),
    )
    .await;

    assert_eq!(stats.unchanged, 1);
    assert_eq!(directory.write_count(), 0);
}

#[tokio::test]
async fn test_failed_writes_are_reported_per_row() {
    let directory = InMemoryDirectory::new();
    directory.insert(
        Collection::Users,
        json!({"id": 9, "first_name": "Old", "last_name": "Doe", "username": "jdoe", "email": "jane@co.com"}),
    );
    directory.fail(Operation::Update, Collection::Users);
    directory.fail(Operation::Create, Collection::Users);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let stats = run(
        &directory,
        &csv_text(USER_HEADER, &["Jane,Doe,jdoe,jane@co.com", "John,Roe,jroe,john@co.com"]),
        &output,
    )
    .await;

    assert_eq!(stats.failed, 2);
    let (_, records) = read_results(&output);
    assert_eq!(records[0][0], "9");
    assert_eq!(records[0][4], "update failed");
    assert_eq!(records[1][0], "");
    assert_eq!(records[1][3].len(), PASSWORD_LENGTH);
    assert_eq!(records[1][4], "create failed");
}

#[tokio::test]
async fn test_create_payload_activates_user() {
    let directory = InMemoryDirectory::new();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    run(&directory, &csv_text(USER_HEADER, &ROWS[..1]), &output).await;

    let create = directory
        .calls()
        .into_iter()
        .find(|c| c.operation == Operation::Create)
        .unwrap();
    let payload = create.payload.unwrap();
    let (_, records) = read_results(&output);
    assert_eq!(payload["activated"], Value::Bool(true));
    assert_eq!(payload["password"], records[0][3].as_str());
    assert_eq!(payload["password_confirmation"], payload["password"]);
}
