//! Name → id resolution for asset rows.
//!
//! Lookups run in a fixed order (user, category, model, status label,
//! location) and stop at the first miss. The user is matched exactly by
//! email; the other four accept the first search hit, trusting the remote's
//! relevance ranking.

use std::collections::HashMap;

use assetsync_directory::{
    Collection, Directory, DirectoryError, DirectoryResult, EntityId, MatchMode, Query,
};
use tracing::{debug, info, warn};

use crate::outcome::EntityKind;
use crate::rows::AssetRow;

/// Ids for every entity an asset row names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntities {
    pub user_id: EntityId,
    /// Resolved only to prove the category exists; no payload carries it.
    pub category_id: EntityId,
    pub model_id: EntityId,
    pub status_id: EntityId,
    pub location_id: EntityId,
}

/// The first lookup that failed, plus what was resolved before it.
#[derive(Debug)]
pub struct Unresolved {
    pub entity: EntityKind,
    /// Set once the user lookup succeeded.
    pub user_id: Option<EntityId>,
    pub cause: DirectoryError,
}

/// Per-run memo of first-hit lookups, keyed by collection and normalized name.
///
/// Results are assumed stable for the length of a run, so caching changes
/// the number of calls but never an outcome. Only successes are stored.
#[derive(Debug, Default)]
pub struct LookupCache {
    entries: HashMap<(Collection, String), EntityId>,
    hits: usize,
}

impl LookupCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(collection: Collection, name: &str) -> (Collection, String) {
        (collection, name.trim().to_lowercase())
    }

    fn get(&mut self, collection: Collection, name: &str) -> Option<EntityId> {
        let found = self.entries.get(&Self::key(collection, name)).cloned();
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    fn insert(&mut self, collection: Collection, name: &str, id: EntityId) {
        self.entries.insert(Self::key(collection, name), id);
    }

    /// Lookups answered from the cache so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve every entity of a (validated) asset row.
pub async fn resolve_asset_entities(
    directory: &dyn Directory,
    row: &AssetRow,
    mut cache: Option<&mut LookupCache>,
) -> Result<ResolvedEntities, Unresolved> {
    let user_id = resolve_user(directory, &row.assigned_to)
        .await
        .map_err(|cause| unresolved(EntityKind::User, &row.assigned_to, None, cause))?;

    let category_id = resolve_named(
        directory,
        EntityKind::Category,
        &row.category_name,
        &user_id,
        cache.as_deref_mut(),
    )
    .await?;
    let model_id = resolve_named(
        directory,
        EntityKind::Model,
        &row.model_name,
        &user_id,
        cache.as_deref_mut(),
    )
    .await?;
    let status_id = resolve_named(
        directory,
        EntityKind::StatusLabel,
        &row.status_label,
        &user_id,
        cache.as_deref_mut(),
    )
    .await?;
    let location_id = resolve_named(
        directory,
        EntityKind::Location,
        &row.location_name,
        &user_id,
        cache.as_deref_mut(),
    )
    .await?;

    Ok(ResolvedEntities {
        user_id,
        category_id,
        model_id,
        status_id,
        location_id,
    })
}

/// Find a user by email; only an exact (case-insensitive) match counts.
pub async fn resolve_user(directory: &dyn Directory, email: &str) -> DirectoryResult<EntityId> {
    let user = directory
        .find_exact(
            Collection::Users,
            &Query::email(email),
            "email",
            MatchMode::IgnoreCase,
        )
        .await?;
    let id = require_id(Collection::Users, user.id())?;
    info!(email = %email, user_id = %id, "User found");
    Ok(id)
}

async fn resolve_named(
    directory: &dyn Directory,
    kind: EntityKind,
    name: &str,
    user_id: &EntityId,
    cache: Option<&mut LookupCache>,
) -> Result<EntityId, Unresolved> {
    let id = resolve_by_name(directory, kind, name, cache)
        .await
        .map_err(|cause| unresolved(kind, name, Some(user_id), cause))?;
    info!(entity = %kind, name = %name, id = %id, "{kind} found: {name}");
    Ok(id)
}

async fn resolve_by_name(
    directory: &dyn Directory,
    kind: EntityKind,
    name: &str,
    cache: Option<&mut LookupCache>,
) -> DirectoryResult<EntityId> {
    let collection = kind.collection();

    if let Some(cache) = cache {
        if let Some(id) = cache.get(collection, name) {
            debug!(entity = %kind, name = %name, id = %id, "Lookup served from cache");
            return Ok(id);
        }
        let id = lookup_first(directory, collection, name).await?;
        cache.insert(collection, name, id.clone());
        return Ok(id);
    }

    lookup_first(directory, collection, name).await
}

async fn lookup_first(
    directory: &dyn Directory,
    collection: Collection,
    name: &str,
) -> DirectoryResult<EntityId> {
    let found = directory.find(collection, &Query::search(name)).await?;
    require_id(collection, found.id())
}

fn require_id(collection: Collection, id: Option<EntityId>) -> DirectoryResult<EntityId> {
    id.ok_or_else(|| DirectoryError::UnexpectedShape(format!("{collection} record has no id")))
}

fn unresolved(
    entity: EntityKind,
    name: &str,
    user_id: Option<&EntityId>,
    cause: DirectoryError,
) -> Unresolved {
    if cause.is_not_found() {
        warn!(entity = %entity, name = %name, "{entity} not found: {name}");
    } else {
        warn!(entity = %entity, name = %name, error = %cause, "{entity} lookup failed");
    }
    Unresolved {
        entity,
        user_id: user_id.cloned(),
        cause,
    }
}
