//! User reconciliation: create with a generated password, update on drift,
//! otherwise leave alone.

use std::io::{Read, Write};

use assetsync_directory::{Collection, Directory, MatchMode, Query, RemoteEntity};
use serde_json::json;
use tracing::{error, info, warn};

use crate::error::ImportResult;
use crate::outcome::{RunStats, UserOutcome};
use crate::password::GeneratedPassword;
use crate::report::{ResultWriter, UserResultRow, USER_RESULT_HEADER};
use crate::rows::{open_reader, UserRow, USER_COLUMNS};

/// `user_id` written for an existing record that carries no id.
const MISSING_ID: &str = "N/A";

/// What happened to one user row.
#[derive(Debug, Clone, PartialEq)]
pub struct UserResult {
    pub user_id: String,
    pub email: String,
    pub username: String,
    /// Set on both create outcomes, successful or not.
    pub password: Option<GeneratedPassword>,
    pub outcome: UserOutcome,
}

impl UserResult {
    fn new(row: &UserRow, user_id: impl Into<String>, outcome: UserOutcome) -> Self {
        Self {
            user_id: user_id.into(),
            email: row.email.clone(),
            username: row.username.clone(),
            password: None,
            outcome,
        }
    }
}

pub struct UserImporter<'a> {
    directory: &'a dyn Directory,
}

impl<'a> UserImporter<'a> {
    pub fn new(directory: &'a dyn Directory) -> Self {
        Self { directory }
    }

    /// Reconcile every row of `input`, writing one result per row to `output`.
    pub async fn run<R: Read, W: Write>(&self, input: R, output: W) -> ImportResult<RunStats> {
        let mut reader = open_reader(input, &USER_COLUMNS)?;
        let mut writer = ResultWriter::new(output, &USER_RESULT_HEADER)?;
        let mut stats = RunStats::default();

        for record in reader.deserialize::<UserRow>() {
            let row = record?;
            let result = self.import_row(&row).await;
            writer.write(&UserResultRow::from(&result))?;
            stats.record(result.outcome.tally());
        }

        writer.finish()?;
        Ok(stats)
    }

    pub async fn import_row(&self, row: &UserRow) -> UserResult {
        let missing = row.missing_fields();
        if !missing.is_empty() {
            warn!(
                email = %row.email,
                missing = %missing.join(", "),
                "Missing required fields in row"
            );
            return UserResult::new(row, "", UserOutcome::MissingFields);
        }

        match self.find_user(&row.email).await {
            Some(existing) => self.reconcile(row, &existing).await,
            None => self.create(row).await,
        }
    }

    /// Existing user with this email. Lookup failures count as absent.
    async fn find_user(&self, email: &str) -> Option<RemoteEntity> {
        match self
            .directory
            .find_exact(
                Collection::Users,
                &Query::email(email),
                "email",
                MatchMode::IgnoreCase,
            )
            .await
        {
            Ok(user) => Some(user),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(email = %email, error = %e, "Error fetching user");
                None
            }
        }
    }

    async fn reconcile(&self, row: &UserRow, existing: &RemoteEntity) -> UserResult {
        let id = existing.id();
        let user_id = id
            .as_ref()
            .map_or_else(|| MISSING_ID.to_string(), ToString::to_string);

        if !needs_update(existing, row) {
            info!(email = %row.email, user_id = %user_id, "Skipped (no change)");
            return UserResult::new(row, user_id, UserOutcome::NoChange);
        }

        let Some(id) = id else {
            error!(email = %row.email, "Failed to update user: existing record has no id");
            return UserResult::new(row, user_id, UserOutcome::UpdateFailed);
        };

        let payload = json!({
            "first_name": row.first_name,
            "last_name": row.last_name,
            "username": row.username,
            "email": row.email,
        });

        match self.directory.update(Collection::Users, &id, &payload).await {
            Ok(()) => {
                info!(email = %row.email, user_id = %user_id, "Updated user");
                UserResult::new(row, user_id, UserOutcome::Updated)
            }
            Err(e) => {
                error!(email = %row.email, user_id = %user_id, error = %e, "Failed to update user");
                UserResult::new(row, user_id, UserOutcome::UpdateFailed)
            }
        }
    }

    async fn create(&self, row: &UserRow) -> UserResult {
        let password = GeneratedPassword::generate();
        let payload = json!({
            "first_name": row.first_name,
            "last_name": row.last_name,
            "username": row.username,
            "email": row.email,
            "password": password.expose(),
            "password_confirmation": password.expose(),
            "activated": true,
        });

        let mut result = match self.directory.create(Collection::Users, &payload).await {
            Ok(created) => {
                let user_id = created.id().map(|id| id.to_string()).unwrap_or_default();
                info!(email = %row.email, user_id = %user_id, "Created new user");
                UserResult::new(row, user_id, UserOutcome::Created)
            }
            Err(e) => {
                error!(email = %row.email, error = %e, "Failed to create user");
                UserResult::new(row, "", UserOutcome::CreateFailed)
            }
        };
        result.password = Some(password);
        result
    }
}

/// Whether the remote record differs from the row.
///
/// Names compare exactly after trimming; username and email ignore case.
pub fn needs_update(existing: &RemoteEntity, row: &UserRow) -> bool {
    let differs_exact = |key: &str, wanted: &str| existing.str_field(key).trim() != wanted.trim();
    let differs_folded = |key: &str, wanted: &str| {
        existing.str_field(key).trim().to_lowercase() != wanted.trim().to_lowercase()
    };

    differs_exact("first_name", &row.first_name)
        || differs_exact("last_name", &row.last_name)
        || differs_folded("username", &row.username)
        || differs_folded("email", &row.email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetsync_directory::testing::{InMemoryDirectory, Operation};
    use assetsync_directory::EntityId;
    use serde_json::Value;

    fn row() -> UserRow {
        UserRow {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            username: "jdoe".to_string(),
            email: "jane@co.com".to_string(),
        }
    }

    fn remote(value: Value) -> RemoteEntity {
        RemoteEntity::from_value(value).unwrap()
    }

    #[test]
    fn test_needs_update_rules() {
        let same = remote(serde_json::json!({
            "first_name": " Jane ", "last_name": "Doe",
            "username": "JDOE", "email": "Jane@Co.com"
        }));
        assert!(!needs_update(&same, &row()));

        let renamed = remote(serde_json::json!({
            "first_name": "jane", "last_name": "Doe",
            "username": "jdoe", "email": "jane@co.com"
        }));
        assert!(needs_update(&renamed, &row()));

        let sparse = remote(serde_json::json!({"email": "jane@co.com"}));
        assert!(needs_update(&sparse, &row()));
    }

    #[tokio::test]
    async fn test_creates_absent_user_with_password() {
        let directory = InMemoryDirectory::new();
        let importer = UserImporter::new(&directory);

        let result = importer.import_row(&row()).await;

        assert_eq!(result.outcome, UserOutcome::Created);
        let password = result.password.unwrap();
        assert_eq!(password.expose().chars().count(), 12);

        let calls = directory.calls();
        let payload = calls[1].payload.as_ref().unwrap();
        assert_eq!(payload["password"], password.expose());
        assert_eq!(payload["password_confirmation"], password.expose());
        assert_eq!(payload["activated"], true);

        let id = EntityId::from(result.user_id.parse::<i64>().unwrap());
        assert!(directory.get(Collection::Users, &id).is_some());
    }

    #[tokio::test]
    async fn test_failed_create_still_reports_password() {
        let directory = InMemoryDirectory::new();
        directory.fail(Operation::Create, Collection::Users);
        let importer = UserImporter::new(&directory);

        let result = importer.import_row(&row()).await;

        assert_eq!(result.outcome, UserOutcome::CreateFailed);
        assert_eq!(result.user_id, "");
        assert!(result.password.is_some());
    }

    #[tokio::test]
    async fn test_matching_user_is_left_alone() {
        let directory = InMemoryDirectory::new();
        directory.insert(
            Collection::Users,
            serde_json::json!({
                "id": 5, "first_name": "Jane", "last_name": "Doe",
                "username": "jdoe", "email": "JANE@co.com"
            }),
        );
        let importer = UserImporter::new(&directory);

        let result = importer.import_row(&row()).await;

        assert_eq!(result.outcome, UserOutcome::NoChange);
        assert_eq!(result.user_id, "5");
        assert!(result.password.is_none());
        assert_eq!(directory.write_count(), 0);
    }

    #[tokio::test]
    async fn test_record_without_id_cannot_be_updated() {
        let directory = InMemoryDirectory::new();
        directory.insert_raw(
            Collection::Users,
            serde_json::json!({"first_name": "Old", "email": "jane@co.com"}),
        );
        let importer = UserImporter::new(&directory);

        let result = importer.import_row(&row()).await;

        assert_eq!(result.outcome, UserOutcome::UpdateFailed);
        assert_eq!(result.user_id, "N/A");
        assert_eq!(directory.write_count(), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_create() {
        let directory = InMemoryDirectory::new();
        directory.fail(Operation::Search, Collection::Users);
        let importer = UserImporter::new(&directory);

        let result = importer.import_row(&row()).await;

        assert_eq!(result.outcome, UserOutcome::Created);
        assert_eq!(directory.count(Operation::Create, Collection::Users), 1);
    }

    #[tokio::test]
    async fn test_missing_field_makes_no_calls() {
        let directory = InMemoryDirectory::new();
        let importer = UserImporter::new(&directory);
        let mut incomplete = row();
        incomplete.username.clear();

        let result = importer.import_row(&incomplete).await;

        assert_eq!(result.outcome, UserOutcome::MissingFields);
        assert!(directory.calls().is_empty());
    }
}
