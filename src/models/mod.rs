//! # Record Store Data Model
//!
//! Collections, their schemas and fields, records, and the request
//! snapshot consumed by the record-search subsystem.

pub mod collection;
pub mod errors;
pub mod field;
pub mod record;
pub mod request;

pub use collection::{
    base_model_field_names, Collection, CollectionType, FIELD_NAME_COLLECTION_ID,
    FIELD_NAME_COLLECTION_NAME, FIELD_NAME_CREATED, FIELD_NAME_EMAIL, FIELD_NAME_EMAIL_VISIBILITY,
    FIELD_NAME_ID, FIELD_NAME_UPDATED, FIELD_NAME_USERNAME, FIELD_NAME_VERIFIED,
};
pub use errors::{ModelError, ModelResult};
pub use field::{Field, FieldType, RelationOptions, Schema, SelectOptions};
pub use record::Record;
pub use request::RequestData;
