//! # Collection DAO
//!
//! In-memory registry of collections with lookup by name or id. The
//! record-search subsystem consults it whenever a filter path crosses
//! into another collection.

pub mod errors;

pub use errors::{DaoError, DaoResult};

use std::collections::HashMap;

use crate::models::Collection;

/// Collection registry keyed by id, with case-insensitive name lookup
#[derive(Debug, Clone, Default)]
pub struct Dao {
    collections: HashMap<String, Collection>,
}

impl Dao {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a collection, replacing any previous entry with the
    /// same id
    pub fn register_collection(&mut self, collection: Collection) {
        self.collections.insert(collection.id.clone(), collection);
    }

    /// Finds a collection by exact id or case-insensitive name
    pub fn find_collection_by_name_or_id(&self, name_or_id: &str) -> DaoResult<&Collection> {
        if let Some(collection) = self.collections.get(name_or_id) {
            return Ok(collection);
        }

        self.collections
            .values()
            .find(|c| c.name.eq_ignore_ascii_case(name_or_id))
            .ok_or_else(|| DaoError::CollectionNotFound(name_or_id.to_string()))
    }

    /// Returns the number of registered collections
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Schema;

    fn sample_dao() -> (Dao, String) {
        let collection = Collection::base("Posts", Schema::default());
        let id = collection.id.clone();

        let mut dao = Dao::new();
        dao.register_collection(collection);
        (dao, id)
    }

    #[test]
    fn test_find_by_id() {
        let (dao, id) = sample_dao();
        assert!(dao.find_collection_by_name_or_id(&id).is_ok());
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let (dao, _) = sample_dao();

        assert!(dao.find_collection_by_name_or_id("Posts").is_ok());
        assert!(dao.find_collection_by_name_or_id("posts").is_ok());
        assert!(dao.find_collection_by_name_or_id("POSTS").is_ok());
    }

    #[test]
    fn test_find_missing() {
        let (dao, _) = sample_dao();

        let err = dao.find_collection_by_name_or_id("missing").unwrap_err();
        assert!(matches!(err, DaoError::CollectionNotFound(_)));
    }

    #[test]
    fn test_register_replaces_same_id() {
        let (mut dao, id) = sample_dao();

        let mut replacement = dao.find_collection_by_name_or_id(&id).unwrap().clone();
        replacement.name = "Renamed".into();
        dao.register_collection(replacement);

        assert_eq!(dao.len(), 1);
        assert!(dao.find_collection_by_name_or_id("renamed").is_ok());
        assert!(dao.find_collection_by_name_or_id("posts").is_err());
    }
}
