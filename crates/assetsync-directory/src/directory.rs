//! The directory seam.

use async_trait::async_trait;
use serde_json::Value;

use crate::collection::{Collection, MatchMode, Query};
use crate::entity::{EntityId, RemoteEntity};
use crate::error::{DirectoryError, DirectoryResult};

/// Read/write access to the remote collections.
///
/// Implementations perform exactly one round trip per call and emit one log
/// line per call. `find` and `find_exact` are built on `search`.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Server-side filtered search; returns every row of the envelope.
    async fn search(
        &self,
        collection: Collection,
        query: &Query,
    ) -> DirectoryResult<Vec<RemoteEntity>>;

    /// Create a record and return it as the server echoed it.
    async fn create(&self, collection: Collection, payload: &Value)
        -> DirectoryResult<RemoteEntity>;

    /// Patch a record by id.
    async fn update(
        &self,
        collection: Collection,
        id: &EntityId,
        payload: &Value,
    ) -> DirectoryResult<()>;

    /// First search hit, without checking that it really matches.
    async fn find(&self, collection: Collection, query: &Query) -> DirectoryResult<RemoteEntity> {
        self.search(collection, query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::NotFound {
                collection,
                query: query.clone(),
            })
    }

    /// First search hit whose `key` field equals the query value.
    ///
    /// The remote search is substring based, so a search for `AB-100` can
    /// return `AB-1000` first.
    async fn find_exact(
        &self,
        collection: Collection,
        query: &Query,
        key: &str,
        mode: MatchMode,
    ) -> DirectoryResult<RemoteEntity> {
        self.search(collection, query)
            .await?
            .into_iter()
            .find(|row| mode.matches(row.str_field(key), query.value()))
            .ok_or_else(|| DirectoryError::NotFound {
                collection,
                query: query.clone(),
            })
    }
}
