//! # Field and Schema Definitions
//!
//! A collection schema is an ordered list of user-authored fields.
//! Relation and select fields carry typed options that determine
//! whether they hold a single value or many.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ModelError, ModelResult};

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 text
    Text,
    /// Numeric value
    Number,
    /// Boolean
    Bool,
    /// Email address
    Email,
    /// URL
    Url,
    /// Datetime string
    Date,
    /// Uploaded file reference
    File,
    /// One or more values from a closed enumeration
    Select,
    /// Arbitrary JSON document
    Json,
    /// One or more record ids pointing into another collection
    Relation,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Bool => "bool",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Date => "date",
            FieldType::File => "file",
            FieldType::Select => "select",
            FieldType::Json => "json",
            FieldType::Relation => "relation",
        }
    }
}

/// Options for select fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOptions {
    /// Maximum number of selectable values; `1` means single-valued
    #[serde(default)]
    pub max_select: i64,

    /// Allowed enumeration values
    #[serde(default)]
    pub values: Vec<String>,
}

impl SelectOptions {
    /// Whether the field can hold more than one value
    pub fn is_multiple(&self) -> bool {
        self.max_select != 1
    }
}

/// Options for relation fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationOptions {
    /// Id of the referenced collection
    pub collection_id: String,

    /// Maximum number of linked records; unset or `> 1` means
    /// multi-valued, `1` means single
    #[serde(default)]
    pub max_select: Option<i64>,

    /// Whether deleting the referenced record cascades
    #[serde(default)]
    pub cascade_delete: bool,
}

impl RelationOptions {
    /// Whether the field can link more than one record
    pub fn is_multiple(&self) -> bool {
        self.max_select != Some(1)
    }
}

/// A single schema field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,

    /// Field data type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field must be present
    #[serde(default)]
    pub required: bool,

    /// Raw type-specific options, decoded on demand
    #[serde(default)]
    pub options: Value,
}

impl Field {
    /// Create a field without options
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            options: Value::Null,
        }
    }

    /// Create a field with raw options
    pub fn with_options(name: impl Into<String>, field_type: FieldType, options: Value) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            options,
        }
    }

    /// Decode the field options as select options
    pub fn select_options(&self) -> ModelResult<SelectOptions> {
        serde_json::from_value(self.options.clone())
            .map_err(|_| ModelError::OptionsDecode(self.name.clone()))
    }

    /// Decode the field options as relation options
    pub fn relation_options(&self) -> ModelResult<RelationOptions> {
        serde_json::from_value(self.options.clone())
            .map_err(|_| ModelError::OptionsDecode(self.name.clone()))
    }
}

/// An ordered set of schema fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema from the given fields
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Returns all fields in definition order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Finds a field by its exact name
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_options_decode() {
        let field = Field::with_options(
            "status",
            FieldType::Select,
            json!({"maxSelect": 1, "values": ["draft", "published"]}),
        );

        let options = field.select_options().unwrap();
        assert_eq!(options.max_select, 1);
        assert_eq!(options.values, vec!["draft", "published"]);
        assert!(!options.is_multiple());
    }

    #[test]
    fn test_select_options_multiple() {
        let field =
            Field::with_options("tags", FieldType::Select, json!({"maxSelect": 3, "values": []}));

        assert!(field.select_options().unwrap().is_multiple());
    }

    #[test]
    fn test_select_options_decode_failure() {
        let field = Field::new("broken", FieldType::Select);
        assert!(field.select_options().is_err());
    }

    #[test]
    fn test_relation_options_decode() {
        let field = Field::with_options(
            "author",
            FieldType::Relation,
            json!({"collectionId": "abc123", "maxSelect": 1}),
        );

        let options = field.relation_options().unwrap();
        assert_eq!(options.collection_id, "abc123");
        assert!(!options.is_multiple());
    }

    #[test]
    fn test_relation_options_unset_max_select_is_multiple() {
        let field =
            Field::with_options("links", FieldType::Relation, json!({"collectionId": "abc123"}));

        let options = field.relation_options().unwrap();
        assert_eq!(options.max_select, None);
        assert!(options.is_multiple());
    }

    #[test]
    fn test_relation_options_missing_collection_id() {
        let field = Field::with_options("links", FieldType::Relation, json!({"maxSelect": 2}));
        assert!(field.relation_options().is_err());
    }

    #[test]
    fn test_schema_field_lookup() {
        let schema = Schema::new(vec![
            Field::new("title", FieldType::Text),
            Field::new("active", FieldType::Bool),
        ]);

        assert!(schema.field_by_name("title").is_some());
        assert!(schema.field_by_name("active").is_some());
        assert!(schema.field_by_name("Title").is_none());
        assert!(schema.field_by_name("missing").is_none());
    }
}
