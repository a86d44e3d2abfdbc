use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::model::FilterKind;

/// The value of one filter entry.
///
/// Serialized untagged: numbers and strings as JSON scalars, sets as arrays
/// and ranges as `{"min": .., "max": ..}` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
    Set(Vec<String>),
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::Set(values.into_iter().map(Into::into).collect())
    }

    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        FilterValue::Range { min, max }
    }

    /// An empty value places no constraint, exactly like an absent one.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Number(_) => false,
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::Set(items) => items.is_empty(),
            FilterValue::Range { min, max } => min.is_none() && max.is_none(),
        }
    }

    /// The numeric reading of this value: numbers as-is, text parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FilterValue::Number(n) => Some(*n),
            FilterValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The textual reading of this value, as typed into an input.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FilterValue::Text(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Normalizes raw control input for a filter of the given kind.
    ///
    /// Returns `None` for input that places no constraint: the empty
    /// string, and number input that does not parse.
    pub fn from_input(kind: FilterKind, raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        match kind {
            FilterKind::Number => raw.trim().parse().ok().map(FilterValue::Number),
            FilterKind::Range => {
                let (min, max) = parse_range(raw);
                if min.is_none() && max.is_none() {
                    None
                } else {
                    Some(FilterValue::Range { min, max })
                }
            }
            FilterKind::MultiSelect => {
                let items: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                if items.is_empty() {
                    None
                } else {
                    Some(FilterValue::Set(items))
                }
            }
            _ => Some(FilterValue::Text(raw.to_string())),
        }
    }
}

/// Parses `min..max`, where either side may be blank. A bare number is a
/// lower bound.
pub(crate) fn parse_range(raw: &str) -> (Option<f64>, Option<f64>) {
    match raw.split_once("..") {
        Some((min, max)) => (min.trim().parse().ok(), max.trim().parse().ok()),
        None => (raw.trim().parse().ok(), None),
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::Set(items) => f.write_str(&items.join(",")),
            FilterValue::Range { min, max } => {
                if let Some(min) = min {
                    write!(f, "{}", min)?;
                }
                f.write_str("..")?;
                if let Some(max) = max {
                    write!(f, "{}", max)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Number(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Number(v as f64)
    }
}
