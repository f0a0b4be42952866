//! # Request Snapshot
//!
//! The per-request context a resolver is constructed with. Snapshotted
//! once; filter evaluation never reads the live request again.

use serde_json::{Map, Value};

use super::record::Record;

/// The request context available to `@request.*` filter fields
#[derive(Debug, Clone, Default)]
pub struct RequestData {
    /// HTTP method of the request
    pub method: String,

    /// Query string parameters
    pub query: Map<String, Value>,

    /// Submitted body data
    pub data: Map<String, Value>,

    /// The authenticated record, if any
    pub auth_record: Option<Record>,
}

impl RequestData {
    /// Create a request snapshot for the given method
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_data_defaults() {
        let data = RequestData::new("get");

        assert_eq!(data.method, "get");
        assert!(data.query.is_empty());
        assert!(data.data.is_empty());
        assert!(data.auth_record.is_none());
    }

    #[test]
    fn test_request_data_maps() {
        let mut data = RequestData::new("post");
        data.query.insert("page".into(), json!(2));
        data.data.insert("title".into(), json!("hello"));

        assert_eq!(data.query["page"], json!(2));
        assert_eq!(data.data["title"], json!("hello"));
    }
}
