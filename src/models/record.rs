//! # Records
//!
//! A record is a row of a collection. Only the export surface needed by
//! the record-search subsystem is modeled here: the public export maps
//! used to snapshot `@request.auth.*` lookups.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::collection::{
    Collection, FIELD_NAME_COLLECTION_ID, FIELD_NAME_COLLECTION_NAME, FIELD_NAME_CREATED,
    FIELD_NAME_EMAIL, FIELD_NAME_EMAIL_VISIBILITY, FIELD_NAME_ID, FIELD_NAME_UPDATED,
    FIELD_NAME_USERNAME, FIELD_NAME_VERIFIED,
};

/// A single row of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Record id
    pub id: String,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last modification timestamp
    pub updated: DateTime<Utc>,

    collection: Collection,
    data: Map<String, Value>,
}

impl Record {
    /// Create an empty record of the given collection with a fresh id
    pub fn new(collection: Collection) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created: now,
            updated: now,
            collection,
            data: Map::new(),
        }
    }

    /// Returns the owning collection
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Sets a data field value
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.data.insert(name.into(), value);
    }

    /// Returns a data field value, or `null` when unset
    pub fn get(&self, name: &str) -> Value {
        self.data.get(name).cloned().unwrap_or(Value::Null)
    }

    /// Returns a data field coerced to bool (`false` when unset)
    pub fn get_bool(&self, name: &str) -> bool {
        self.data.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Whether the record's email may be publicly exported
    pub fn email_visibility(&self) -> bool {
        self.get_bool(FIELD_NAME_EMAIL_VISIBILITY)
    }

    /// Exports the record's public fields.
    ///
    /// For auth collections the email is included only when the record
    /// has its email visibility enabled.
    pub fn public_export(&self) -> Map<String, Value> {
        self.export(false)
    }

    /// Exports the record's public fields, including the email of auth
    /// records regardless of their visibility setting.
    ///
    /// Used for system-level snapshots that must see hidden fields
    /// without mutating the shared record.
    pub fn public_export_ignoring_visibility(&self) -> Map<String, Value> {
        self.export(true)
    }

    fn export(&self, ignore_email_visibility: bool) -> Map<String, Value> {
        let mut out = Map::new();

        out.insert(FIELD_NAME_ID.into(), Value::String(self.id.clone()));
        out.insert(
            FIELD_NAME_COLLECTION_ID.into(),
            Value::String(self.collection.id.clone()),
        );
        out.insert(
            FIELD_NAME_COLLECTION_NAME.into(),
            Value::String(self.collection.name.clone()),
        );
        out.insert(
            FIELD_NAME_CREATED.into(),
            Value::String(self.created.to_rfc3339()),
        );
        out.insert(
            FIELD_NAME_UPDATED.into(),
            Value::String(self.updated.to_rfc3339()),
        );

        if self.collection.is_auth() {
            out.insert(FIELD_NAME_USERNAME.into(), self.get(FIELD_NAME_USERNAME));
            out.insert(
                FIELD_NAME_VERIFIED.into(),
                Value::Bool(self.get_bool(FIELD_NAME_VERIFIED)),
            );
            out.insert(
                FIELD_NAME_EMAIL_VISIBILITY.into(),
                Value::Bool(self.email_visibility()),
            );
            if ignore_email_visibility || self.email_visibility() {
                out.insert(FIELD_NAME_EMAIL.into(), self.get(FIELD_NAME_EMAIL));
            }
        }

        for field in self.collection.schema.fields() {
            out.insert(field.name.clone(), self.get(&field.name));
        }

        out
    }
}
