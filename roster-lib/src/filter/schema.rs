use std::collections::BTreeMap;

use crate::model::ColumnDescriptor;
use crate::model::FilterKind;

/// Maps filter keys to the kind of predicate that evaluates them.
///
/// Keys without a descriptor evaluate as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSchema {
    kinds: BTreeMap<String, FilterKind>,
}

impl FilterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the filter descriptors of every column.
    ///
    /// When two columns declare the same filter key, the first one wins.
    pub fn from_columns(columns: &[ColumnDescriptor]) -> Self {
        let mut schema = Self::new();
        for filter in columns.iter().flat_map(|c| c.filters.iter()) {
            schema.kinds.entry(filter.key.clone()).or_insert(filter.kind);
        }
        schema
    }

    pub fn with(mut self, key: impl Into<String>, kind: FilterKind) -> Self {
        self.insert(key, kind);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, kind: FilterKind) {
        self.kinds.insert(key.into(), kind);
    }

    pub fn kind_of(&self, key: &str) -> FilterKind {
        self.kinds.get(key).copied().unwrap_or(FilterKind::Text)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.kinds.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_columns;

    #[test]
    fn test_schema_from_employee_columns() {
        let schema = FilterSchema::from_columns(&default_columns());
        assert_eq!(schema.kind_of("age"), FilterKind::Number);
        assert_eq!(schema.kind_of("hireDate"), FilterKind::Date);
        assert_eq!(schema.kind_of("department"), FilterKind::Select);
        assert_eq!(schema.kind_of("name"), FilterKind::Text);
        assert_eq!(schema.len(), 9);
    }

    #[test]
    fn test_unknown_key_is_text() {
        let schema = FilterSchema::new();
        assert!(!schema.contains("nickname"));
        assert_eq!(schema.kind_of("nickname"), FilterKind::Text);
    }
}
