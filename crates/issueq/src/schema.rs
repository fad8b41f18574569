//! JSON Schema export for the snapshot format.
//!
//! Tools that produce snapshots can validate against the schema printed by
//! `issueq schema` instead of reverse-engineering the reader.

use crate::domain::SnapshotDocument;
use schemars::schema::RootSchema;
use schemars::schema_for;

/// JSON Schema describing a snapshot document
pub fn snapshot_schema() -> RootSchema {
    schema_for!(SnapshotDocument)
}

/// Pretty-printed snapshot schema
pub fn snapshot_schema_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&snapshot_schema())
}
