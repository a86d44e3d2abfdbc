//! Filter state store
//!
//! The only writer of the grid's [`FilterState`]. Every accepted edit bumps
//! the revision and is reported back synchronously as a [`FilterChange`].

use log::trace;

use roster_lib::filter::FilterState;
use roster_lib::filter::FilterValue;
use roster_lib::model::FilterKind;

/// One applied edit together with the state it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChange {
    pub key: String,
    pub value: Option<FilterValue>,
    pub revision: u64,
    pub state: FilterState,
}

#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    state: FilterState,
    revision: u64,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing state.
    pub fn with_state(state: FilterState) -> Self {
        Self { state, revision: 0 }
    }

    /// Replaces the value for `key`; empty values are stored as cleared.
    pub fn set_filter(&mut self, key: &str, value: Option<FilterValue>) -> FilterChange {
        self.state.set(key, value);
        self.revision += 1;
        let value = self.state.get(key).cloned();
        trace!("filter {} = {:?} (rev {})", key, value, self.revision);
        FilterChange {
            key: key.to_string(),
            value,
            revision: self.revision,
            state: self.state.clone(),
        }
    }

    /// Normalizes raw control input for a filter of `kind`, then stores it.
    pub fn set_input(&mut self, key: &str, kind: FilterKind, raw: &str) -> FilterChange {
        self.set_filter(key, FilterValue::from_input(kind, raw))
    }

    pub fn clear_filter(&mut self, key: &str) -> FilterChange {
        self.set_filter(key, None)
    }

    /// Only the entries that place a constraint.
    pub fn get_active_filters(&self) -> FilterState {
        self.state.active_state()
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.state.get(key)
    }

    /// The full state, cleared entries included.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn has_active(&self) -> bool {
        self.state.has_active()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drops every entry.
    pub fn reset(&mut self) {
        self.state = FilterState::new();
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_null() {
        let mut store = FilterStore::new();
        let change = store.set_input("name", FilterKind::Text, "");
        assert_eq!(change.value, None);
        assert!(store.state().contains_key("name"));
        assert!(!store.has_active());
    }

    #[test]
    fn test_unparsable_number_is_null() {
        let mut store = FilterStore::new();
        store.set_input("age", FilterKind::Number, "3o");
        assert_eq!(store.get("age"), None);
        store.set_input("age", FilterKind::Number, "30");
        assert_eq!(store.get("age"), Some(&FilterValue::Number(30.0)));
    }

    #[test]
    fn test_edits_apply_in_order() {
        let mut store = FilterStore::new();
        store.set_input("name", FilterKind::Text, "김");
        store.set_input("name", FilterKind::Text, "김철");
        let change = store.set_input("email", FilterKind::Text, "co");
        assert_eq!(change.revision, 3);
        assert_eq!(store.get("name"), Some(&FilterValue::text("김철")));

        store.clear_filter("name");
        let active = store.get_active_filters();
        assert_eq!(active.len(), 1);
        assert_eq!(active.get("email"), Some(&FilterValue::text("co")));
    }

    #[test]
    fn test_reset_empties_state() {
        let mut store = FilterStore::with_state(FilterState::new().with("age", 30i64));
        store.reset();
        assert!(store.state().is_empty());
        assert_eq!(store.revision(), 1);
    }
}
