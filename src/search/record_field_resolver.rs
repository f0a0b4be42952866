//! # Record Field Resolver
//!
//! Translates a dotted, user-supplied field path from a filter or sort
//! expression (e.g. `self_rel_many.self_rel_one.title`,
//! `@request.auth.email`, `@collection.products.price`) into a SQL
//! identifier, bound parameters, and the LEFT JOINs the surrounding
//! SELECT needs for that identifier to resolve.
//!
//! A resolver is constructed once per request for a base collection
//! and a request snapshot, accumulates joins across `resolve` calls,
//! and is applied to the caller's query once via `update_query`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::dao::Dao;
use crate::db::{Expression, SelectQuery};
use crate::models::{
    Collection, Field, FieldType, RequestData, FIELD_NAME_EMAIL, FIELD_NAME_EMAIL_VISIBILITY,
};
use crate::tools::{inflector, list, security};

use super::errors::{ResolverError, SearchResult};
use super::join::Join;
use super::multi_match::MultiMatchSubquery;
use super::resolver::{FieldResolver, ResolverResult};

const SELECT_EACH_MODIFIER: &str = "each";
const ISSET_MODIFIER: &str = "isset";

/// Auth filter fields that resolve from the request snapshot without
/// joining the auth collection.
const PLAIN_REQUEST_AUTH_FIELDS: &[&str] = &[
    "@request.auth.id",
    "@request.auth.collectionId",
    "@request.auth.collectionName",
    "@request.auth.username",
    "@request.auth.email",
    "@request.auth.emailVisibility",
    "@request.auth.verified",
    "@request.auth.created",
    "@request.auth.updated",
];

/// Per-call state carried through a single path walk.
struct WalkState {
    current_collection_name: String,
    current_alias: String,
    allow_hidden_fields: bool,
    nullify_missing: bool,
    with_multi_match: bool,
    mm_alias: String,
    mm: MultiMatchSubquery,
}

/// Resolves record filter fields for a base collection and request
/// snapshot. Single-use per request; not thread-safe.
pub struct RecordFieldResolver<'a> {
    dao: &'a Dao,
    base_collection: Collection,
    allow_hidden_fields: bool,
    allowed_fields: Vec<String>,
    loaded_collections: Vec<Collection>,
    joins: Vec<Join>,
    request_data: Option<RequestData>,
    static_request_data: Map<String, Value>,
}

impl<'a> RecordFieldResolver<'a> {
    /// Create a resolver for the given base collection.
    ///
    /// The request snapshot (including the auth record's public
    /// export) is taken here; later mutations of the request are not
    /// observed. The auth export always includes the email, bypassing
    /// its visibility flag without mutating the shared record.
    pub fn new(
        dao: &'a Dao,
        base_collection: &Collection,
        request_data: Option<&RequestData>,
        allow_hidden_fields: bool,
    ) -> Self {
        let mut static_request_data = Map::new();
        if let Some(rd) = request_data {
            static_request_data.insert("method".into(), Value::String(rd.method.clone()));
            static_request_data.insert("query".into(), Value::Object(rd.query.clone()));
            static_request_data.insert("data".into(), Value::Object(rd.data.clone()));
            let auth = match &rd.auth_record {
                Some(record) => Value::Object(record.public_export_ignoring_visibility()),
                None => Value::Null,
            };
            static_request_data.insert("auth".into(), auth);
        }

        Self {
            dao,
            base_collection: base_collection.clone(),
            allow_hidden_fields,
            allowed_fields: vec![
                r"^\w+[\w.]*$".into(),
                r"^@request\.method$".into(),
                r"^@request\.auth\.\w+[\w.]*$".into(),
                r"^@request\.data\.\w+[\w.]*$".into(),
                r"^@request\.query\.\w+[\w.]*$".into(),
                r"^@collection\.\w+\.\w+[\w.]*$".into(),
            ],
            loaded_collections: vec![base_collection.clone()],
            joins: Vec::new(),
            request_data: request_data.cloned(),
            static_request_data,
        }
    }

    /// Returns the joins registered so far, in registration order
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    fn resolve_field(&mut self, field_name: &str) -> SearchResult<ResolverResult> {
        if !list::exist_in_slice_with_regex(field_name, &self.allowed_fields) {
            return Err(ResolverError::UnresolvableField(field_name.to_string()));
        }

        debug!(field = field_name, "resolving record field");

        let props: Vec<String> = field_name.split('.').map(str::to_string).collect();

        let base_alias = inflector::columnify(&self.base_collection.name);
        let mut state = WalkState {
            current_collection_name: self.base_collection.name.clone(),
            current_alias: base_alias.clone(),
            allow_hidden_fields: self.allow_hidden_fields,
            nullify_missing: false,
            with_multi_match: false,
            mm_alias: format!("__mm_{}", base_alias),
            mm: MultiMatchSubquery::new(base_alias.clone(), base_alias),
        };

        let mut start = 0usize;

        if props[0] == "@collection" {
            // non-relational join: "@collection.COLLECTION_NAME.FIELD[.FIELD2...]"
            if props.len() < 3 {
                return Err(ResolverError::InvalidPath(field_name.to_string()));
            }

            let collection = self.load_collection(&props[1])?;
            let clean_name = inflector::columnify(&collection.name);

            state.current_collection_name = collection.name.clone();
            state.current_alias = inflector::columnify(&format!("__collection_{}", collection.name));

            // @collection fans out across unrelated rows
            state.with_multi_match = true;

            // @collection.* is a system filter
            state.allow_hidden_fields = true;

            self.register_join(clean_name.clone(), state.current_alias.clone(), None);

            state.mm_alias = format!("__mm{}", state.current_alias);
            state
                .mm
                .joins
                .push(Join::new(clean_name, state.mm_alias.clone()));

            start = 2;
        } else if props[0] == "@request" {
            if props.len() == 1 {
                return Err(ResolverError::InvalidPath(field_name.to_string()));
            }

            let request_data = match self.request_data.clone() {
                Some(rd) => rd,
                None => return Ok(ResolverResult::null()),
            };

            // @request.* is a system filter
            state.allow_hidden_fields = true;

            // missing @request.* keys resolve to NULL for consistency
            // across dynamic request payloads
            state.nullify_missing = true;

            if field_name.starts_with("@request.data.") && props.len() > 3 {
                let data_field = self.base_collection.schema.field_by_name(&props[2]).cloned();

                if let Some(field) = &data_field {
                    if field.field_type == FieldType::Select
                        && props[3] == SELECT_EACH_MODIFIER
                        && props.len() == 4
                    {
                        return self.resolve_request_data_select_each(field, &request_data, state);
                    }
                }

                let rel_field = match data_field {
                    Some(f) if f.field_type == FieldType::Relation => f,
                    // empty and non-relational data fields fall back to
                    // the static snapshot
                    _ => return self.resolve_static_request_field(&props[1..]),
                };

                let options = rel_field.relation_options()?;
                let rel_collection = self.load_collection(&options.collection_id)?;
                let clean_name = inflector::columnify(&rel_collection.name);

                let data_rel_ids = list::to_unique_string_slice(
                    request_data
                        .data
                        .get(&rel_field.name)
                        .unwrap_or(&Value::Null),
                );
                if data_rel_ids.is_empty() {
                    return Ok(ResolverResult::null());
                }
                let id_values: Vec<Value> =
                    data_rel_ids.into_iter().map(Value::String).collect();

                state.current_collection_name = rel_collection.name.clone();
                state.current_alias =
                    inflector::columnify(&format!("__data_{}", rel_collection.name));

                self.register_join(
                    clean_name.clone(),
                    state.current_alias.clone(),
                    Some(Expression::in_values(
                        format!("{}.id", state.current_alias),
                        id_values.clone(),
                    )),
                );

                if options.is_multiple() {
                    state.with_multi_match = true;
                }

                state.mm_alias =
                    inflector::columnify(&format!("__data_mm_{}", rel_collection.name));
                state.mm.joins.push(Join::with_on(
                    clean_name,
                    state.mm_alias.clone(),
                    Expression::in_values(format!("{}.id", state.mm_alias), id_values),
                ));

                start = 3;
            } else {
                if !field_name.starts_with("@request.auth.")
                    || list::exist_in_slice(field_name, PLAIN_REQUEST_AUTH_FIELDS)
                {
                    return self.resolve_static_request_field(&props[1..]);
                }

                // the remaining @request.auth.* fields require joining
                // the auth collection
                let auth_record = match request_data.auth_record {
                    Some(record) => record,
                    None => return Ok(ResolverResult::null()),
                };

                let collection = auth_record.collection().clone();
                let clean_name = inflector::columnify(&collection.name);
                self.loaded_collections.push(collection.clone());

                state.current_collection_name = collection.name.clone();
                state.current_alias = format!("__auth_{}", clean_name);

                self.register_join(
                    clean_name.clone(),
                    state.current_alias.clone(),
                    Some(Expression::hash(
                        format!("{}.id", state.current_alias),
                        Value::String(auth_record.id.clone()),
                    )),
                );

                state.mm_alias = format!("__mm_{}", state.current_alias);
                state.mm.joins.push(Join::with_on(
                    clean_name,
                    state.mm_alias.clone(),
                    Expression::hash(
                        format!("{}.id", state.mm_alias),
                        Value::String(auth_record.id.clone()),
                    ),
                ));

                start = 2;
            }
        }

        self.walk(state, &props[start..], field_name)
    }

    /// Walks the remaining schema path segments after root dispatch.
    fn walk(
        &mut self,
        mut state: WalkState,
        props: &[String],
        field_name: &str,
    ) -> SearchResult<ResolverResult> {
        let total = props.len();

        for (i, prop) in props.iter().enumerate() {
            let collection = self.load_collection(&state.current_collection_name)?;
            let is_last = i == total - 1;

            // system fields are always available but not part of the
            // collection schema
            if is_last && list::exist_in_slice(prop, &collection.system_field_names()) {
                let clean = inflector::columnify(prop);
                let mut result =
                    ResolverResult::identifier(format!("[[{}.{}]]", state.current_alias, clean));

                // only auth records with a public email may be queried
                if prop == FIELD_NAME_EMAIL && !state.allow_hidden_fields {
                    let alias = state.current_alias.clone();
                    result.after_build = Some(Box::new(move |expr| {
                        Expression::and(vec![
                            expr,
                            Expression::new(format!(
                                "[[{}.{}]] = TRUE",
                                alias, FIELD_NAME_EMAIL_VISIBILITY
                            )),
                        ])
                    }));
                }

                if state.with_multi_match {
                    state.mm.value_identifier = format!("[[{}.{}]]", state.mm_alias, clean);
                    result.multi_match_subquery = Some(state.mm);
                }

                return Ok(result);
            }

            let field = match collection.schema.field_by_name(prop) {
                Some(f) => f.clone(),
                None => {
                    if state.nullify_missing {
                        return Ok(ResolverResult::null());
                    }
                    return Err(ResolverError::UnknownField(prop.clone()));
                }
            };

            if is_last {
                let clean = inflector::columnify(prop);
                let mut result =
                    ResolverResult::identifier(format!("[[{}.{}]]", state.current_alias, clean));

                if state.with_multi_match {
                    state.mm.value_identifier = format!("[[{}.{}]]", state.mm_alias, clean);
                    result.multi_match_subquery = Some(state.mm);
                }

                return Ok(result);
            }

            // select field with a trailing `each` modifier
            if field.field_type == FieldType::Select
                && props[i + 1] == SELECT_EACH_MODIFIER
                && i + 2 == total
            {
                let clean = inflector::columnify(prop);
                let je_pair = format!("{}.{}", state.current_alias, clean);
                let je_alias = format!("{}_{}_je", state.current_alias, clean);
                self.register_join(json_each(&je_pair), je_alias.clone(), None);

                let mut result = ResolverResult::identifier(format!("[[{}.value]]", je_alias));

                let options = field.select_options()?;
                if options.is_multiple() {
                    state.with_multi_match = true;
                }

                if state.with_multi_match {
                    let je_pair2 = format!("{}.{}", state.mm_alias, clean);
                    let je_alias2 = format!("{}_{}_je", state.mm_alias, clean);
                    state
                        .mm
                        .joins
                        .push(Join::new(json_each(&je_pair2), je_alias2.clone()));
                    state.mm.value_identifier = format!("[[{}.value]]", je_alias2);
                    result.multi_match_subquery = Some(state.mm);
                }

                return Ok(result);
            }

            // json field: the remaining segments form a JSON path
            if field.field_type == FieldType::Json {
                let mut json_path = String::from("$");
                for p in &props[i + 1..] {
                    if !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()) {
                        json_path.push('[');
                        json_path.push_str(&inflector::columnify(p));
                        json_path.push(']');
                    } else {
                        json_path.push('.');
                        json_path.push_str(&inflector::columnify(p));
                    }
                }

                let clean = inflector::columnify(prop);
                let mut result = ResolverResult::identifier(format!(
                    "JSON_EXTRACT([[{}.{}]], '{}')",
                    state.current_alias, clean, json_path
                ));

                if state.with_multi_match {
                    state.mm.value_identifier = format!(
                        "JSON_EXTRACT([[{}.{}]], '{}')",
                        state.mm_alias, clean, json_path
                    );
                    result.multi_match_subquery = Some(state.mm);
                }

                return Ok(result);
            }

            if field.field_type != FieldType::Relation {
                return Err(ResolverError::NotARelation(prop.clone()));
            }

            // relation hop: join the referenced collection through the
            // normalized json_each iterable
            let options = field.relation_options()?;
            let rel_collection = self.load_collection(&options.collection_id)?;
            let clean = inflector::columnify(&field.name);

            let new_alias = format!("{}_{}", state.current_alias, clean);
            let je_alias = format!("{}_{}_je", state.current_alias, clean);
            let je_pair = format!("{}.{}", state.current_alias, clean);
            self.register_join(json_each(&je_pair), je_alias.clone(), None);
            self.register_join(
                inflector::columnify(&rel_collection.name),
                new_alias.clone(),
                Some(Expression::new(format!(
                    "[[{}.id]] = [[{}.value]]",
                    new_alias, je_alias
                ))),
            );
            state.current_collection_name = rel_collection.name.clone();
            state.current_alias = new_alias;

            if options.is_multiple() {
                state.with_multi_match = true;
            }

            let new_mm_alias = format!("{}_{}", state.mm_alias, clean);
            let je_alias2 = format!("{}_{}_je", state.mm_alias, clean);
            let je_pair2 = format!("{}.{}", state.mm_alias, clean);
            state
                .mm
                .joins
                .push(Join::new(json_each(&je_pair2), je_alias2.clone()));
            state.mm.joins.push(Join::with_on(
                inflector::columnify(&rel_collection.name),
                new_mm_alias.clone(),
                Expression::new(format!(
                    "[[{}.id]] = [[{}.value]]",
                    new_mm_alias, je_alias2
                )),
            ));
            state.mm_alias = new_mm_alias;
        }

        Err(ResolverError::UnresolvableField(field_name.to_string()))
    }

    /// Resolves `@request.data.<selectField>.each` by iterating the
    /// submitted values through a bound `json_each` table.
    fn resolve_request_data_select_each(
        &mut self,
        field: &Field,
        request_data: &RequestData,
        mut state: WalkState,
    ) -> SearchResult<ResolverResult> {
        let items = list::to_unique_string_slice(
            request_data.data.get(&field.name).unwrap_or(&Value::Null),
        );
        let raw_json = Value::Array(items.into_iter().map(Value::String).collect()).to_string();

        let placeholder = format!("dataSelect{}", security::pseudorandom_string(4));
        let clean = inflector::columnify(&field.name);
        let je_table = format!("json_each({{:{}}})", placeholder);
        let je_alias = format!("__dataSelect_{}_je", clean);
        self.register_join(je_table, je_alias.clone(), None);

        let mut result = ResolverResult::identifier(format!("[[{}.value]]", je_alias));
        result
            .params
            .insert(placeholder.clone(), Value::String(raw_json.clone()));

        let options = field.select_options()?;
        if options.is_multiple() {
            state.with_multi_match = true;
        }

        if state.with_multi_match {
            let placeholder2 = format!("mm{}", placeholder);
            let je_table2 = format!("json_each({{:{}}})", placeholder2);
            let je_alias2 = format!("__mm{}", je_alias);

            state.mm.joins.push(Join::new(je_table2, je_alias2.clone()));
            state.mm.params.insert(placeholder2, Value::String(raw_json));
            state.mm.value_identifier = format!("[[{}.value]]", je_alias2);

            result.multi_match_subquery = Some(state.mm);
        }

        Ok(result)
    }

    /// Resolves `@request.*` paths that need no JOIN, from the
    /// construction-time snapshot.
    fn resolve_static_request_field(&self, path: &[String]) -> SearchResult<ResolverResult> {
        let has_isset_suffix = path.last().map(|p| p == ISSET_MODIFIER).unwrap_or(false);
        let path = if has_isset_suffix {
            &path[..path.len() - 1]
        } else {
            path
        };

        let value = extract_nested_map_val(&self.static_request_data, path);

        if has_isset_suffix {
            // a key that exists but holds null still counts as set
            return Ok(ResolverResult::identifier(if value.is_some() {
                "TRUE"
            } else {
                "FALSE"
            }));
        }

        // missing keys resolve to NULL since request payloads are dynamic
        let value = match value {
            None | Some(Value::Null) => return Ok(ResolverResult::null()),
            Some(v) => v,
        };

        let bound = match value {
            Value::String(_) | Value::Bool(_) | Value::Number(_) => value.clone(),
            other => Value::String(other.to_string()),
        };

        let placeholder = format!("f{}", security::pseudorandom_string(5));
        let mut result = ResolverResult::identifier(format!("{{:{}}}", placeholder));
        result.params.insert(placeholder, bound);

        Ok(result)
    }

    /// Returns an already loaded collection or fetches and caches it.
    fn load_collection(&mut self, name_or_id: &str) -> SearchResult<Collection> {
        for collection in &self.loaded_collections {
            if collection.id == name_or_id || collection.name.eq_ignore_ascii_case(name_or_id) {
                return Ok(collection.clone());
            }
        }

        let collection = self
            .dao
            .find_collection_by_name_or_id(name_or_id)
            .map_err(|_| ResolverError::UnknownCollection(name_or_id.to_string()))?
            .clone();
        self.loaded_collections.push(collection.clone());

        Ok(collection)
    }

    /// Registers a join, replacing any previous join with the same
    /// alias.
    fn register_join(&mut self, table: String, alias: String, on: Option<Expression>) {
        let join = Join { table, alias, on };

        if let Some(existing) = self.joins.iter_mut().find(|j| j.alias == join.alias) {
            *existing = join;
            return;
        }

        debug!(alias = %join.alias, "registered query join");
        self.joins.push(join);
    }
}

impl FieldResolver for RecordFieldResolver<'_> {
    fn resolve(&mut self, field: &str) -> SearchResult<ResolverResult> {
        self.resolve_field(field)
    }

    fn update_query(&self, query: &mut SelectQuery) -> SearchResult<()> {
        if !self.joins.is_empty() {
            query.distinct(true);

            for join in &self.joins {
                query.left_join(join.table.clone(), join.alias.clone(), join.on.clone());
            }
        }

        Ok(())
    }
}

/// Wraps a `table.column` pair in the `json_each` normalization that
/// makes scalar single-relation storage and JSON-array multi-relation
/// storage equally iterable.
fn json_each(table_column_pair: &str) -> String {
    format!(
        "json_each(CASE WHEN json_valid([[{0}]]) THEN [[{0}]] ELSE json_array([[{0}]]) END)",
        table_column_pair
    )
}

/// Looks up a nested key chain in a JSON object map.
///
/// Returns `None` when any key along the chain is absent or an
/// intermediate value is not an object.
fn extract_nested_map_val<'v>(m: &'v Map<String, Value>, keys: &[String]) -> Option<&'v Value> {
    let (first, rest) = keys.split_first()?;
    let value = m.get(first)?;

    if rest.is_empty() {
        return Some(value);
    }

    match value {
        Value::Object(nested) => extract_nested_map_val(nested, rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_json_each_wrapper() {
        assert_eq!(
            json_each("demo4.self_rel_one"),
            "json_each(CASE WHEN json_valid([[demo4.self_rel_one]]) THEN [[demo4.self_rel_one]] ELSE json_array([[demo4.self_rel_one]]) END)"
        );
    }

    #[test]
    fn test_extract_nested_map_val() {
        let m = match json!({"a": {"b": {"c": 1}}, "d": null}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };

        assert_eq!(extract_nested_map_val(&m, &keys(&["a", "b", "c"])), Some(&json!(1)));
        assert_eq!(extract_nested_map_val(&m, &keys(&["d"])), Some(&Value::Null));
        assert_eq!(extract_nested_map_val(&m, &keys(&["a", "missing"])), None);
        assert_eq!(extract_nested_map_val(&m, &keys(&["a", "b", "c", "deep"])), None);
        assert_eq!(extract_nested_map_val(&m, &keys(&["missing"])), None);
        assert_eq!(extract_nested_map_val(&m, &[]), None);
    }
}
