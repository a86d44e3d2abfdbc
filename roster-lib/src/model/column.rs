//! Column and filter descriptors
//!
//! Column metadata is plain data so that it can be served by the column
//! metadata endpoint. Display callbacks (formatters, tooltips, conditional
//! styles) are not part of it; clients register those locally by column key.

use serde::Deserialize;
use serde::Serialize;

/// The kind of value a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Text,
    Number,
    Date,
    Select,
}

/// The kind of filter control, which also selects the predicate rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[default]
    Text,
    Number,
    Date,
    Select,
    Range,
    MultiSelect,
    /// Any type name this version does not know.
    #[serde(other)]
    Unknown,
}

impl FilterKind {
    /// Returns `true` for kinds whose input is free text.
    pub fn is_text_input(&self) -> bool {
        matches!(
            self,
            FilterKind::Text | FilterKind::Number | FilterKind::Date | FilterKind::Range | FilterKind::Unknown
        )
    }

    /// Returns `true` for kinds that pick from a fixed option list.
    pub fn is_choice(&self) -> bool {
        matches!(self, FilterKind::Select | FilterKind::MultiSelect)
    }
}

/// Horizontal alignment of header or body cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// An option of a select or multi-select filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// An option whose label equals its value.
    pub fn same(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// One filter control declared by a column.
///
/// The filter `key` names the row field it constrains, which may differ
/// from the owning column's key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: FilterKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default = "default_true")]
    pub searchable: bool,
}

fn default_true() -> bool {
    true
}

impl FilterDescriptor {
    /// Creates a filter of the given kind on `key`.
    pub fn new(key: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            kind,
            label: None,
            placeholder: None,
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
            searchable: true,
        }
    }

    pub fn text(key: impl Into<String>) -> Self {
        Self::new(key, FilterKind::Text)
    }

    pub fn number(key: impl Into<String>) -> Self {
        Self::new(key, FilterKind::Number)
    }

    pub fn date(key: impl Into<String>) -> Self {
        Self::new(key, FilterKind::Date)
    }

    pub fn select(key: impl Into<String>, options: impl IntoIterator<Item = SelectOption>) -> Self {
        let mut filter = Self::new(key, FilterKind::Select);
        filter.options = options.into_iter().collect();
        filter
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Placeholder text, falling back to "<label or key> search".
    pub fn placeholder_text(&self) -> String {
        match &self.placeholder {
            Some(p) => p.clone(),
            None => format!("{} search", self.label.as_deref().unwrap_or(&self.key)),
        }
    }
}

/// Header cell display options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderOptions {
    #[serde(default)]
    pub align: Align,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Body cell display options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyOptions {
    #[serde(default)]
    pub align: Align,
}

/// Describes one grid column: its field, label and filter controls.
///
/// # Example
///
/// ```
/// use roster_lib::model::{ColumnDescriptor, FilterDescriptor, ValueType};
///
/// let age = ColumnDescriptor::new("age", "나이")
///     .value_type(ValueType::Number)
///     .filter(FilterDescriptor::number("age"));
///
/// assert!(age.filterable);
/// assert_eq!(age.filters.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterDescriptor>,
    /// Preferred width in terminal cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    #[serde(default)]
    pub header: HeaderOptions,
    #[serde(default)]
    pub body: BodyOptions,
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value_type: ValueType::Text,
            filterable: true,
            filters: Vec::new(),
            width: None,
            header: HeaderOptions::default(),
            body: BodyOptions::default(),
        }
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn filter(mut self, filter: FilterDescriptor) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn header(mut self, header: HeaderOptions) -> Self {
        self.header = header;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.body.align = align;
        self
    }

    /// Filter controls that are actually shown (none when not filterable).
    pub fn active_filters(&self) -> &[FilterDescriptor] {
        if self.filterable { &self.filters } else { &[] }
    }

    /// Looks up one of this column's filters by key.
    pub fn find_filter(&self, filter_key: &str) -> Option<&FilterDescriptor> {
        self.filters.iter().find(|f| f.key == filter_key)
    }
}
