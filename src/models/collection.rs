//! # Collection Definitions
//!
//! A collection is a named, schema-bearing table of records. Auth
//! collections additionally carry the implicit account fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field::Schema;

/// System field present on every record
pub const FIELD_NAME_ID: &str = "id";
/// System field present on every record
pub const FIELD_NAME_CREATED: &str = "created";
/// System field present on every record
pub const FIELD_NAME_UPDATED: &str = "updated";
/// Export-only key referencing the owning collection id
pub const FIELD_NAME_COLLECTION_ID: &str = "collectionId";
/// Export-only key referencing the owning collection name
pub const FIELD_NAME_COLLECTION_NAME: &str = "collectionName";
/// Implicit field on auth collections
pub const FIELD_NAME_USERNAME: &str = "username";
/// Implicit field on auth collections
pub const FIELD_NAME_EMAIL: &str = "email";
/// Implicit field on auth collections
pub const FIELD_NAME_EMAIL_VISIBILITY: &str = "emailVisibility";
/// Implicit field on auth collections
pub const FIELD_NAME_VERIFIED: &str = "verified";

/// Returns the system fields every record carries regardless of schema
pub fn base_model_field_names() -> Vec<&'static str> {
    vec![FIELD_NAME_ID, FIELD_NAME_CREATED, FIELD_NAME_UPDATED]
}

/// Collection kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    /// Plain record collection
    Base,
    /// Collection whose records are authenticable principals
    Auth,
}

/// A named set of fields with a unique id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique collection id
    pub id: String,

    /// Unique collection name
    pub name: String,

    /// Collection kind
    #[serde(rename = "type")]
    pub collection_type: CollectionType,

    /// User-authored field definitions
    pub schema: Schema,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last modification timestamp
    pub updated: DateTime<Utc>,
}

impl Collection {
    /// Create a base collection with a fresh id
    pub fn base(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, CollectionType::Base, schema)
    }

    /// Create an auth collection with a fresh id
    pub fn auth(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, CollectionType::Auth, schema)
    }

    fn new(name: impl Into<String>, collection_type: CollectionType, schema: Schema) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            collection_type,
            schema,
            created: now,
            updated: now,
        }
    }

    /// Whether this is an auth collection
    pub fn is_auth(&self) -> bool {
        self.collection_type == CollectionType::Auth
    }

    /// Returns the system field names available on this collection,
    /// including the implicit account fields for auth collections
    pub fn system_field_names(&self) -> Vec<&'static str> {
        let mut names = base_model_field_names();
        if self.is_auth() {
            names.extend([
                FIELD_NAME_USERNAME,
                FIELD_NAME_VERIFIED,
                FIELD_NAME_EMAIL_VISIBILITY,
                FIELD_NAME_EMAIL,
            ]);
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::{Field, FieldType};

    #[test]
    fn test_collection_construction() {
        let collection = Collection::base("posts", Schema::default());

        assert!(!collection.id.is_empty());
        assert_eq!(collection.name, "posts");
        assert!(!collection.is_auth());
    }

    #[test]
    fn test_unique_ids() {
        let a = Collection::base("a", Schema::default());
        let b = Collection::base("b", Schema::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_system_field_names_base() {
        let collection = Collection::base("posts", Schema::default());
        assert_eq!(collection.system_field_names(), vec!["id", "created", "updated"]);
    }

    #[test]
    fn test_system_field_names_auth() {
        let collection = Collection::auth("users", Schema::default());
        let names = collection.system_field_names();

        assert!(names.contains(&"username"));
        assert!(names.contains(&"verified"));
        assert!(names.contains(&"emailVisibility"));
        assert!(names.contains(&"email"));
    }

    #[test]
    fn test_schema_attached() {
        let schema = Schema::new(vec![Field::new("title", FieldType::Text)]);
        let collection = Collection::base("posts", schema);

        assert!(collection.schema.field_by_name("title").is_some());
    }
}
