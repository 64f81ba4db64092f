//! Filtering of the assignment collection into the visible view.
//!
//! Filtering never mutates the store: [`apply`] borrows the records and
//! returns the matching subset in the original order.
//!
//! # Example
//!
//! ```
//! use equiptrack::filter::{apply, FilterCriteria};
//! use equiptrack::RecordStore;
//! use serde_json::json;
//!
//! let mut store = RecordStore::new();
//! store
//!     .load(json!([
//!         {"id": 1, "sede": "Cota", "cargo": "Analista"},
//!         {"id": 2, "sede": "Cali", "cargo": "Gerente"},
//!     ]))
//!     .unwrap();
//!
//! let criteria = FilterCriteria::new().with_site("Cota");
//! let view = apply(store.list(), &criteria);
//! assert_eq!(view.len(), 1);
//! assert_eq!(view[0].id, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::record::{AssignmentRecord, Field};

/// What the operator typed into the search box and the two filters.
///
/// An empty criterion matches everything; the three combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring searched in every value of the record.
    pub text_query: String,
    /// Exact match against `sede`.
    pub site_filter: String,
    /// Case-insensitive substring searched in `cargo`.
    pub role_filter: String,
}

impl FilterCriteria {
    /// Criteria that match every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text query.
    #[must_use]
    pub fn with_text(mut self, query: impl Into<String>) -> Self {
        self.text_query = query.into();
        self
    }

    /// Set the site filter.
    #[must_use]
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site_filter = site.into();
        self
    }

    /// Set the role filter.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role_filter = role.into();
        self
    }

    /// Whether every criterion is unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text_query.is_empty() && self.site_filter.is_empty() && self.role_filter.is_empty()
    }

    /// Check a single record against the criteria.
    #[must_use]
    pub fn matches(&self, record: &AssignmentRecord) -> bool {
        self.matches_text(record) && self.matches_site(record) && self.matches_role(record)
    }

    fn matches_text(&self, record: &AssignmentRecord) -> bool {
        if self.text_query.is_empty() {
            return true;
        }
        let needle = self.text_query.to_lowercase();
        record
            .search_values()
            .any(|value| value.to_lowercase().contains(&needle))
    }

    fn matches_site(&self, record: &AssignmentRecord) -> bool {
        self.site_filter.is_empty() || record.get(Field::Sede) == Some(self.site_filter.as_str())
    }

    fn matches_role(&self, record: &AssignmentRecord) -> bool {
        if self.role_filter.is_empty() {
            return true;
        }
        record
            .get(Field::Cargo)
            .is_some_and(|cargo| cargo.to_lowercase().contains(&self.role_filter.to_lowercase()))
    }
}

/// Compute the visible subset of `records`, preserving their order.
#[must_use]
pub fn apply<'a>(
    records: &'a [AssignmentRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a AssignmentRecord> {
    if criteria.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// Counts shown above the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewStats {
    /// Records in the store.
    pub total: usize,
    /// Records that pass the current criteria.
    pub filtered: usize,
}

impl ViewStats {
    /// Compute counts for a collection and criteria.
    #[must_use]
    pub fn compute(records: &[AssignmentRecord], criteria: &FilterCriteria) -> Self {
        Self {
            total: records.len(),
            filtered: records.iter().filter(|r| criteria.matches(r)).count(),
        }
    }

    /// Message to show instead of an empty table, if the view is empty.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.filtered > 0 {
            None
        } else if self.total == 0 {
            Some("No hay datos para mostrar")
        } else {
            Some("No se encontraron registros con los filtros aplicados")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordFields;
    use crate::store::RecordStore;
    use serde_json::json;

    fn seeded() -> RecordStore {
        let mut store = RecordStore::new();
        store
            .load(json!([
                {"id": 1, "usuario": "jdoe", "sede": "Cota", "cargo": "Analista de Datos"},
                {"id": 2, "usuario": "mperez", "sede": "Cali", "cargo": "Gerente"},
                {"id": 3, "usuario": "lgomez", "sede": "Cota", "cargo": "ANALISTA"},
            ]))
            .unwrap();
        store
    }

    fn ids(view: &[&AssignmentRecord]) -> Vec<u64> {
        view.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_criteria_returns_everything_in_order() {
        let store = seeded();
        let view = apply(store.list(), &FilterCriteria::new());
        assert_eq!(ids(&view), vec![1, 2, 3]);
    }

    #[test]
    fn test_site_filter_exact() {
        let store = seeded();
        let view = apply(store.list(), &FilterCriteria::new().with_site("Cota"));
        assert_eq!(ids(&view), vec![1, 3]);

        let view = apply(store.list(), &FilterCriteria::new().with_site("cota"));
        assert!(view.is_empty());
    }

    #[test]
    fn test_role_filter_case_insensitive_substring() {
        let store = seeded();
        let view = apply(store.list(), &FilterCriteria::new().with_role("analista"));
        assert_eq!(ids(&view), vec![1, 3]);
    }

    #[test]
    fn test_text_query_searches_all_values() {
        let store = seeded();
        let view = apply(store.list(), &FilterCriteria::new().with_text("PEREZ"));
        assert_eq!(ids(&view), vec![2]);

        let view = apply(store.list(), &FilterCriteria::new().with_text("cali"));
        assert_eq!(ids(&view), vec![2]);
    }

    #[test]
    fn test_text_query_matches_id() {
        let store = seeded();
        let view = apply(store.list(), &FilterCriteria::new().with_text("3"));
        assert_eq!(ids(&view), vec![3]);
    }

    #[test]
    fn test_criteria_compose_with_and() {
        let store = seeded();
        let criteria = FilterCriteria::new()
            .with_site("Cota")
            .with_role("analista")
            .with_text("lgo");
        let view = apply(store.list(), &criteria);
        assert_eq!(ids(&view), vec![3]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let store = seeded();
        let criteria = FilterCriteria::new().with_role("analista");
        let once: Vec<AssignmentRecord> = apply(store.list(), &criteria)
            .into_iter()
            .cloned()
            .collect();
        let twice = apply(&once, &criteria);
        assert_eq!(ids(&twice), vec![1, 3]);
    }

    #[test]
    fn test_missing_and_non_string_fields() {
        let mut store = RecordStore::new();
        store
            .load(json!([
                {"id": 1, "serial": 98765, "activo": true},
                {"id": 2, "cargo": null},
            ]))
            .unwrap();

        let view = apply(store.list(), &FilterCriteria::new().with_text("9876"));
        assert_eq!(ids(&view), vec![1]);

        let view = apply(store.list(), &FilterCriteria::new().with_text("true"));
        assert_eq!(ids(&view), vec![1]);

        let view = apply(store.list(), &FilterCriteria::new().with_role("x"));
        assert!(view.is_empty());

        let view = apply(store.list(), &FilterCriteria::new().with_site("Cota"));
        assert!(view.is_empty());
    }

    #[test]
    fn test_created_records_search_sentinel() {
        let mut store = RecordStore::new();
        store.create(&RecordFields::new()).unwrap();
        let view = apply(store.list(), &FilterCriteria::new().with_text("n/a"));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_is_empty() {
        assert!(FilterCriteria::new().is_empty());
        assert!(!FilterCriteria::new().with_text(" ").is_empty());
    }

    #[test]
    fn test_criteria_deserialize_camel_case() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"siteFilter": "Cota"}"#).unwrap();
        assert_eq!(criteria, FilterCriteria::new().with_site("Cota"));
    }

    #[test]
    fn test_view_stats() {
        let store = seeded();
        let stats = ViewStats::compute(store.list(), &FilterCriteria::new().with_site("Cota"));
        assert_eq!(stats, ViewStats { total: 3, filtered: 2 });
        assert!(stats.empty_message().is_none());
    }

    #[test]
    fn test_view_stats_empty_messages() {
        let empty = ViewStats::default();
        assert_eq!(empty.empty_message(), Some("No hay datos para mostrar"));

        let filtered_out = ViewStats { total: 4, filtered: 0 };
        assert_eq!(
            filtered_out.empty_message(),
            Some("No se encontraron registros con los filtros aplicados")
        );
    }
}
