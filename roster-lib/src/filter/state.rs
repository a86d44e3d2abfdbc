use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::FilterSchema;
use super::FilterValue;
use crate::model::FilterKind;

/// Filter key to filter value.
///
/// Cleared entries are kept as `None` so that the state remembers which
/// controls were touched. Absent, `None` and empty values all place no
/// constraint; only the remaining entries are "active".
///
/// # Example
///
/// ```
/// use roster_lib::filter::{FilterState, FilterValue};
///
/// let mut state = FilterState::new();
/// state.set("name", Some(FilterValue::text("김")));
/// state.set("email", Some(FilterValue::text("")));
///
/// assert_eq!(state.active().count(), 1);
/// assert_eq!(state.get("email"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    entries: BTreeMap<String, Option<FilterValue>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the value for `key`. Empty values are stored as `None`.
    pub fn set(&mut self, key: impl Into<String>, value: Option<FilterValue>) {
        let value = value.filter(|v| !v.is_empty());
        self.entries.insert(key.into(), value);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(key, Some(value.into()));
        self
    }

    pub fn clear(&mut self, key: impl Into<String>) {
        self.set(key, None);
    }

    /// The active value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    /// Whether `key` was ever set, even if it is now cleared.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Active entries in key order.
    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
            .filter(|(_, v)| !v.is_empty())
    }

    /// A copy holding only the active entries.
    pub fn active_state(&self) -> FilterState {
        FilterState {
            entries: self
                .active()
                .map(|(k, v)| (k.to_string(), Some(v.clone())))
                .collect(),
        }
    }

    pub fn has_active(&self) -> bool {
        self.active().next().is_some()
    }

    /// Number of entries, cleared ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Query-string pairs for the active entries.
    ///
    /// Sets become repeated keys and ranges become `min..max`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in self.active() {
            match value {
                FilterValue::Set(items) => {
                    pairs.extend(items.iter().map(|item| (key.to_string(), item.clone())));
                }
                other => pairs.push((key.to_string(), other.to_string())),
            }
        }
        pairs
    }

    /// Encoded query string of the active entries, stable for equal states.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// Rebuilds a state from query-string pairs, reading each value with the
    /// kind the schema declares for its key.
    ///
    /// Repeated keys of multi-select filters accumulate; for any other kind
    /// the last occurrence wins. Values that place no constraint are dropped.
    pub fn from_query_pairs<I, K, V>(pairs: I, schema: &FilterSchema) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = FilterState::new();
        for (key, raw) in pairs {
            let key = key.as_ref();
            let kind = schema.kind_of(key);
            let Some(value) = FilterValue::from_input(kind, raw.as_ref()) else {
                continue;
            };
            if kind == FilterKind::MultiSelect {
                if let (Some(Some(FilterValue::Set(items))), FilterValue::Set(more)) =
                    (state.entries.get_mut(key), &value)
                {
                    items.extend(more.iter().cloned());
                    continue;
                }
            }
            state.set(key, Some(value));
        }
        state
    }
}

impl<K: Into<String>> FromIterator<(K, FilterValue)> for FilterState {
    fn from_iter<T: IntoIterator<Item = (K, FilterValue)>>(iter: T) -> Self {
        let mut state = FilterState::new();
        for (key, value) in iter {
            state.set(key, Some(value));
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_columns;

    #[test]
    fn test_empty_string_is_stored_as_cleared() {
        let mut state = FilterState::new();
        state.set("name", Some(FilterValue::text("")));
        assert!(state.contains_key("name"));
        assert_eq!(state.get("name"), None);
        assert!(!state.has_active());
    }

    #[test]
    fn test_last_write_wins() {
        let mut state = FilterState::new();
        state.set("name", Some(FilterValue::text("김")));
        state.set("name", Some(FilterValue::text("이")));
        assert_eq!(state.get("name"), Some(&FilterValue::text("이")));
        state.clear("name");
        assert_eq!(state.get("name"), None);
    }

    #[test]
    fn test_query_pairs_only_active_entries() {
        let mut state = FilterState::new()
            .with("age", 30i64)
            .with("location", FilterValue::set(["서울", "부산"]));
        state.clear("name");

        assert_eq!(
            state.to_query_pairs(),
            vec![
                ("age".to_string(), "30".to_string()),
                ("location".to_string(), "서울".to_string()),
                ("location".to_string(), "부산".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_string_is_encoded() {
        let state = FilterState::new().with("department", "개발팀");
        assert_eq!(
            state.to_query_string(),
            "department=%EA%B0%9C%EB%B0%9C%ED%8C%80"
        );
        assert_eq!(FilterState::new().to_query_string(), "");
    }

    #[test]
    fn test_from_query_pairs_uses_schema_kinds() {
        let schema = FilterSchema::from_columns(&default_columns())
            .with("tags", FilterKind::MultiSelect)
            .with("score", FilterKind::Range);
        let pairs = [
            ("age", "30"),
            ("name", "김"),
            ("salary", "lots"),
            ("tags", "a"),
            ("tags", "b"),
            ("score", "1..5"),
            ("email", ""),
        ];
        let state = FilterState::from_query_pairs(pairs, &schema);

        assert_eq!(state.get("age"), Some(&FilterValue::Number(30.0)));
        assert_eq!(state.get("name"), Some(&FilterValue::text("김")));
        assert_eq!(state.get("salary"), None);
        assert_eq!(state.get("tags"), Some(&FilterValue::set(["a", "b"])));
        assert_eq!(
            state.get("score"),
            Some(&FilterValue::range(Some(1.0), Some(5.0)))
        );
        assert!(!state.contains_key("email"));
    }
}
