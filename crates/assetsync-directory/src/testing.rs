//! In-memory directory for tests.
//!
//! Behaves like a small, stateful remote: searches match substrings
//! case-insensitively (as the real search does), creates assign numeric ids,
//! updates merge fields. Every call is recorded so tests can assert on call
//! counts and payloads. Individual operations can be forced to fail.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::collection::{Collection, Query};
use crate::directory::Directory;
use crate::entity::{EntityId, RemoteEntity};
use crate::error::{DirectoryError, DirectoryResult};

/// Kind of directory call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    Create,
    Update,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: Operation,
    pub collection: Collection,
    pub query: Option<Query>,
    pub id: Option<EntityId>,
    pub payload: Option<Value>,
}

#[derive(Debug, Default)]
struct State {
    records: HashMap<Collection, Vec<Map<String, Value>>>,
    next_id: i64,
    calls: Vec<Call>,
    failing: HashSet<(Operation, Collection)>,
}

impl State {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Stateful [`Directory`] double.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: Mutex<State>,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a record. An `id` is assigned unless the value carries one.
    pub fn insert(&self, collection: Collection, value: Value) -> EntityId {
        let Value::Object(mut fields) = value else {
            panic!("InMemoryDirectory::insert expects a JSON object");
        };
        let mut state = self.lock();
        let id = match fields.get("id").and_then(EntityId::from_value) {
            Some(id) => {
                if let Some(n) = id.as_value().as_i64() {
                    state.next_id = state.next_id.max(n);
                }
                id
            }
            None => {
                let id = EntityId::from(state.assign_id());
                fields.insert("id".to_string(), id.as_value().clone());
                id
            }
        };
        state.records.entry(collection).or_default().push(fields);
        id
    }

    /// Seed a record exactly as given, even without a usable id.
    pub fn insert_raw(&self, collection: Collection, value: Value) {
        let Value::Object(fields) = value else {
            panic!("InMemoryDirectory::insert_raw expects a JSON object");
        };
        self.lock()
            .records
            .entry(collection)
            .or_default()
            .push(fields);
    }

    /// Make every `operation` on `collection` fail with HTTP 500.
    pub fn fail(&self, operation: Operation, collection: Collection) {
        self.lock().failing.insert((operation, collection));
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of calls of one kind against one collection.
    #[must_use]
    pub fn count(&self, operation: Operation, collection: Collection) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation && c.collection == collection)
            .count()
    }

    /// Number of create and update calls across all collections.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation != Operation::Search)
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Current state of a record.
    #[must_use]
    pub fn get(&self, collection: Collection, id: &EntityId) -> Option<Value> {
        self.lock()
            .records
            .get(&collection)
            .and_then(|rows| rows.iter().find(|r| has_id(r, id)))
            .cloned()
            .map(Value::Object)
    }

    /// All records of a collection, in insertion order.
    #[must_use]
    pub fn records(&self, collection: Collection) -> Vec<Value> {
        self.lock()
            .records
            .get(&collection)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    fn record_call(&self, call: Call) -> DirectoryResult<()> {
        let mut state = self.lock();
        let forced = state.failing.contains(&(call.operation, call.collection));
        state.calls.push(call);
        if forced {
            return Err(DirectoryError::Server {
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

fn has_id(record: &Map<String, Value>, id: &EntityId) -> bool {
    record.get("id").and_then(EntityId::from_value).as_ref() == Some(id)
}

fn matches_query(record: &Map<String, Value>, query: &Query) -> bool {
    let needle = query.value().to_lowercase();
    let contains = |v: &Value| {
        v.as_str()
            .is_some_and(|s| s.to_lowercase().contains(&needle))
    };
    match query.param() {
        "search" => record.values().any(contains),
        field => record.get(field).is_some_and(contains),
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn search(
        &self,
        collection: Collection,
        query: &Query,
    ) -> DirectoryResult<Vec<RemoteEntity>> {
        self.record_call(Call {
            operation: Operation::Search,
            collection,
            query: Some(query.clone()),
            id: None,
            payload: None,
        })?;

        let state = self.lock();
        Ok(state
            .records
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|r| matches_query(r, query))
                    .cloned()
                    .filter_map(|r| RemoteEntity::from_value(Value::Object(r)))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create(
        &self,
        collection: Collection,
        payload: &Value,
    ) -> DirectoryResult<RemoteEntity> {
        self.record_call(Call {
            operation: Operation::Create,
            collection,
            query: None,
            id: None,
            payload: Some(payload.clone()),
        })?;

        let Value::Object(fields) = payload else {
            return Err(DirectoryError::Server {
                status: 422,
                body: "payload is not an object".to_string(),
            });
        };

        let mut state = self.lock();
        let mut record = fields.clone();
        let id = state.assign_id();
        record.insert("id".to_string(), Value::from(id));
        state
            .records
            .entry(collection)
            .or_default()
            .push(record.clone());
        Ok(RemoteEntity::from_value(Value::Object(record)).unwrap_or_default())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &EntityId,
        payload: &Value,
    ) -> DirectoryResult<()> {
        self.record_call(Call {
            operation: Operation::Update,
            collection,
            query: None,
            id: Some(id.clone()),
            payload: Some(payload.clone()),
        })?;

        let mut state = self.lock();
        let record = state
            .records
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|r| has_id(r, id)))
            .ok_or_else(|| DirectoryError::Server {
                status: 404,
                body: format!("{collection} {id} not found"),
            })?;
        if let Value::Object(fields) = payload {
            for (key, value) in fields {
                record.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }
}
