//! Row predicates
//!
//! Pure functions of (field value, filter value, filter kind). The same
//! rules run in the client for local filtering and in the server for the
//! listing endpoint.

use super::FilterSchema;
use super::FilterState;
use super::FilterValue;
use crate::model::FilterKind;
use crate::model::Row;
use crate::model::Value;

/// Select value meaning "every option".
pub fn is_all_sentinel(value: &str) -> bool {
    value.eq_ignore_ascii_case("all") || value == "전체"
}

/// Evaluates one field against one filter value.
///
/// A missing or empty filter always matches. Otherwise:
///
/// - `text`: case-insensitive containment of the filter in the field's
///   string form.
/// - `number`: the field is numeric and at least the filter value. Text
///   that does not parse as a number places no constraint.
/// - `range`: the field is numeric and within the inclusive bounds.
/// - `date`: exact equality of string forms.
/// - `select`, `multi-select`: equality with the field's string form (set
///   membership for sets); the empty string and the "all" sentinel match
///   everything.
/// - anything else: string equality, a null field reading as `""`.
pub fn matches(field: &Value, filter: Option<&FilterValue>, kind: FilterKind) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    if filter.is_empty() {
        return true;
    }

    match kind {
        FilterKind::Text => contains_ignore_case(&field.to_match_string(), &filter.as_text()),
        FilterKind::Number => match filter.as_number() {
            Some(threshold) => field.as_f64().is_some_and(|v| v >= threshold),
            None => true,
        },
        FilterKind::Range => {
            let (min, max) = match filter {
                FilterValue::Range { min, max } => (*min, *max),
                FilterValue::Text(raw) => super::value::parse_range(raw),
                other => (other.as_number(), None),
            };
            if min.is_none() && max.is_none() {
                return true;
            }
            field.as_f64().is_some_and(|v| {
                min.is_none_or(|min| v >= min) && max.is_none_or(|max| v <= max)
            })
        }
        FilterKind::Date => field.to_match_string() == filter.as_text(),
        FilterKind::Select | FilterKind::MultiSelect => {
            let field = field.to_match_string();
            match filter {
                FilterValue::Set(items) => items
                    .iter()
                    .any(|item| item.is_empty() || is_all_sentinel(item) || *item == field),
                other => {
                    let wanted = other.as_text();
                    is_all_sentinel(&wanted) || field == wanted
                }
            }
        }
        FilterKind::Unknown => field.to_match_string() == filter.as_text(),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whether a row satisfies every active entry of `state`.
pub fn row_matches(row: &Row, state: &FilterState, schema: &FilterSchema) -> bool {
    state
        .active()
        .all(|(key, value)| matches(row.value(key), Some(value), schema.kind_of(key)))
}

/// The rows that satisfy `state`, in their original order.
///
/// # Example
///
/// ```
/// use roster_lib::filter::{apply, FilterSchema, FilterState};
/// use roster_lib::model::{FilterKind, Row};
///
/// let rows = vec![
///     Row::new(1).with("age", 32i64),
///     Row::new(2).with("age", 28i64),
/// ];
/// let schema = FilterSchema::new().with("age", FilterKind::Number);
/// let state = FilterState::new().with("age", 30i64);
///
/// let matched = apply(&rows, &state, &schema);
/// assert_eq!(matched.len(), 1);
/// assert_eq!(matched[0].id, 1.into());
/// ```
pub fn apply(rows: &[Row], state: &FilterState, schema: &FilterSchema) -> Vec<Row> {
    rows.iter()
        .filter(|row| row_matches(row, state, schema))
        .cloned()
        .collect()
}
