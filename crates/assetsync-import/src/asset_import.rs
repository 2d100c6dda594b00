//! Hardware reconciliation.

use std::io::{Read, Write};

use assetsync_directory::{Collection, Directory, EntityId, MatchMode, Query, RemoteEntity};
use serde_json::json;
use tracing::{error, info, warn};

use crate::error::ImportResult;
use crate::outcome::{AssetOutcome, RunStats};
use crate::report::{AssetResultRow, ResultWriter, ASSET_RESULT_HEADER};
use crate::resolver::{resolve_asset_entities, LookupCache, ResolvedEntities};
use crate::rows::{open_reader, AssetRow, ASSET_COLUMNS};

/// What happened to one asset row.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResult {
    pub row: AssetRow,
    /// Existing asset for updates and failed assignments, new asset for creates.
    pub asset_id: Option<EntityId>,
    pub user_id: Option<EntityId>,
    pub outcome: AssetOutcome,
}

impl AssetResult {
    fn new(row: AssetRow, outcome: AssetOutcome) -> Self {
        Self {
            row,
            asset_id: None,
            user_id: None,
            outcome,
        }
    }
}

/// Creates missing assets and reassigns existing ones, one row at a time.
pub struct AssetImporter<'a> {
    directory: &'a dyn Directory,
    cache: Option<LookupCache>,
}

impl<'a> AssetImporter<'a> {
    pub fn new(directory: &'a dyn Directory) -> Self {
        Self {
            directory,
            cache: None,
        }
    }

    /// Memoize category, model, status and location lookups for this run.
    #[must_use]
    pub fn with_lookup_cache(mut self) -> Self {
        self.cache = Some(LookupCache::new());
        self
    }

    pub fn cache(&self) -> Option<&LookupCache> {
        self.cache.as_ref()
    }

    /// Reconcile every row of `input`, writing one result per row to `output`.
    ///
    /// Per-row failures end up in the results file; only I/O and CSV
    /// structure problems are returned.
    pub async fn run<R: Read, W: Write>(&mut self, input: R, output: W) -> ImportResult<RunStats> {
        let mut reader = open_reader(input, &ASSET_COLUMNS)?;
        let mut writer = ResultWriter::new(output, &ASSET_RESULT_HEADER)?;
        let mut stats = RunStats::default();

        for record in reader.deserialize::<AssetRow>() {
            let row = record?;
            let result = self.import_row(row).await;
            writer.write(&AssetResultRow::from(&result))?;
            stats.record(result.outcome.tally());
        }

        writer.finish()?;
        Ok(stats)
    }

    /// Reconcile a single row.
    pub async fn import_row(&mut self, row: AssetRow) -> AssetResult {
        let missing = row.missing_fields();
        if !missing.is_empty() {
            warn!(
                asset_tag = %row.asset_tag,
                missing = %missing.join(", "),
                "Missing required fields in row"
            );
            return AssetResult::new(row, AssetOutcome::MissingFields);
        }

        let resolved =
            match resolve_asset_entities(self.directory, &row, self.cache.as_mut()).await {
                Ok(resolved) => resolved,
                Err(unresolved) => {
                    let mut result = AssetResult::new(row, AssetOutcome::NotFound(unresolved.entity));
                    result.user_id = unresolved.user_id;
                    return result;
                }
            };

        let user_id = Some(resolved.user_id.clone());
        let (asset_id, outcome) = match self.find_asset(&row.asset_tag).await {
            Some(existing) => self.assign(&row, &resolved, &existing).await,
            None => self.create(&row, &resolved).await,
        };

        AssetResult {
            row,
            asset_id,
            user_id,
            outcome,
        }
    }

    /// Existing asset with exactly this tag. Lookup failures count as absent.
    async fn find_asset(&self, asset_tag: &str) -> Option<RemoteEntity> {
        match self
            .directory
            .find_exact(
                Collection::Hardware,
                &Query::search(asset_tag),
                "asset_tag",
                MatchMode::Exact,
            )
            .await
        {
            Ok(asset) => Some(asset),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                error!(asset_tag = %asset_tag, error = %e, "Error fetching asset");
                None
            }
        }
    }

    async fn assign(
        &self,
        row: &AssetRow,
        resolved: &ResolvedEntities,
        existing: &RemoteEntity,
    ) -> (Option<EntityId>, AssetOutcome) {
        let Some(asset_id) = existing.id() else {
            error!(asset_tag = %row.asset_tag, "Failed to assign asset: existing record has no id");
            return (None, AssetOutcome::AssignFailed);
        };

        let payload = json!({
            "assigned_user": resolved.user_id,
            "location_id": resolved.location_id,
            "serial": row.serial,
        });

        match self
            .directory
            .update(Collection::Hardware, &asset_id, &payload)
            .await
        {
            Ok(()) => {
                info!(
                    asset_tag = %row.asset_tag,
                    assigned_to = %row.assigned_to,
                    asset_id = %asset_id,
                    "Updated existing asset"
                );
                (Some(asset_id), AssetOutcome::Updated)
            }
            Err(e) => {
                error!(asset_tag = %row.asset_tag, error = %e, "Failed to assign asset");
                (Some(asset_id), AssetOutcome::AssignFailed)
            }
        }
    }

    async fn create(
        &self,
        row: &AssetRow,
        resolved: &ResolvedEntities,
    ) -> (Option<EntityId>, AssetOutcome) {
        let payload = json!({
            "asset_tag": row.asset_tag,
            "model_id": resolved.model_id,
            "status_id": resolved.status_id,
            "name": row.name,
            "assigned_user": resolved.user_id,
            "location_id": resolved.location_id,
            "serial": row.serial,
        });

        match self.directory.create(Collection::Hardware, &payload).await {
            Ok(created) => {
                let asset_id = created.id();
                let shown = asset_id.as_ref().map(ToString::to_string).unwrap_or_default();
                info!(
                    asset_tag = %row.asset_tag,
                    assigned_to = %row.assigned_to,
                    asset_id = %shown,
                    "Created asset"
                );
                (asset_id, AssetOutcome::Created)
            }
            Err(e) => {
                error!(asset_tag = %row.asset_tag, error = %e, "Failed to create asset");
                (None, AssetOutcome::CreateFailed)
            }
        }
    }
}
