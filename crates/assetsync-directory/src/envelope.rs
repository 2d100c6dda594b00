//! Response envelope parsing.
//!
//! Searches answer `{"rows": [...]}`. Creates answer with the new record in
//! `payload` (hardware), `data` (users) or, from some deployments, `rows[0]`.
//! The API reports validation failures as a success status whose body has
//! `"status": "error"`.

use serde_json::Value;

use crate::collection::Collection;
use crate::entity::RemoteEntity;
use crate::error::{DirectoryError, DirectoryResult};

/// Parse a search body into its rows. Non-object rows are dropped.
pub fn parse_rows(body: &str) -> DirectoryResult<Vec<RemoteEntity>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| DirectoryError::UnexpectedShape(format!("invalid JSON: {e}")))?;

    let Value::Object(mut map) = value else {
        return Err(DirectoryError::UnexpectedShape(
            "search response is not an object".to_string(),
        ));
    };

    match map.remove("rows") {
        Some(Value::Array(rows)) => Ok(rows
            .into_iter()
            .filter_map(RemoteEntity::from_value)
            .collect()),
        Some(_) => Err(DirectoryError::UnexpectedShape(
            "'rows' is not a list".to_string(),
        )),
        None => Err(DirectoryError::UnexpectedShape(format!(
            "'rows' key not found; keys available: {:?}",
            map.keys().collect::<Vec<_>>()
        ))),
    }
}

/// Fail with [`DirectoryError::Rejected`] when the body reports an error status.
pub fn check_rejected(body: &Value) -> DirectoryResult<()> {
    if body.get("status").and_then(Value::as_str) == Some("error") {
        let messages = match body.get("messages") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "no messages".to_string(),
        };
        return Err(DirectoryError::Rejected(messages));
    }
    Ok(())
}

/// Extract the created record from a create response body.
pub fn extract_created(collection: Collection, body: &str) -> DirectoryResult<RemoteEntity> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let value = match (collection, parsed) {
        (_, Some(value)) => value,
        // A user create with a non-JSON body still succeeded; there's just no id to report.
        (Collection::Users, None) => return Ok(RemoteEntity::default()),
        (_, None) => {
            return Err(DirectoryError::UnexpectedShape(
                "create response is not JSON".to_string(),
            ))
        }
    };

    check_rejected(&value)?;

    let found = match collection {
        Collection::Hardware => object_field(&value, "payload").or_else(|| first_row(&value)),
        Collection::Users => object_field(&value, "data").or_else(|| top_level(&value)),
        _ => object_field(&value, "payload")
            .or_else(|| object_field(&value, "data"))
            .or_else(|| first_row(&value))
            .or_else(|| top_level(&value)),
    };

    found.ok_or_else(|| {
        DirectoryError::UnexpectedShape(format!(
            "create response for {collection} has no record"
        ))
    })
}

fn object_field(value: &Value, key: &str) -> Option<RemoteEntity> {
    value
        .get(key)
        .filter(|v| v.is_object())
        .cloned()
        .and_then(RemoteEntity::from_value)
}

fn first_row(value: &Value) -> Option<RemoteEntity> {
    value
        .get("rows")
        .and_then(Value::as_array)
        .and_then(|rows| rows.first())
        .cloned()
        .and_then(RemoteEntity::from_value)
}

fn top_level(value: &Value) -> Option<RemoteEntity> {
    RemoteEntity::from_value(value.clone())
}
