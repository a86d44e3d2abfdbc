//! Body cell rendering
//!
//! Column metadata never carries display logic. Renderers are registered on
//! the client by column key and must be pure functions of the cell value
//! and its row.

use std::collections::HashMap;
use std::fmt;

use roster_lib::model::Row;
use roster_lib::model::Value;

use crate::style::CellStyle;

/// Text shown for a null field.
pub const NULL_TEXT: &str = "-";

/// What a renderer produces for one cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellDisplay {
    pub text: String,
    pub style: CellStyle,
    pub tooltip: Option<String>,
}

impl CellDisplay {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn styled(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

pub trait CellRenderer: Send + Sync {
    fn render(&self, value: &Value, row: &Row) -> CellDisplay;
}

/// The value's string form, or `-` for null.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl CellRenderer for PlainText {
    fn render(&self, value: &Value, _row: &Row) -> CellDisplay {
        match value {
            Value::Null => CellDisplay::text(NULL_TEXT),
            other => CellDisplay::text(other.to_string()),
        }
    }
}

type FormatFn = Box<dyn Fn(&Value, &Row) -> String + Send + Sync>;
type TooltipFn = Box<dyn Fn(&Value, &Row) -> Option<String> + Send + Sync>;
type StyleFn = Box<dyn Fn(&Value, &Row) -> CellStyle + Send + Sync>;

/// A renderer assembled from optional formatter, tooltip and style
/// functions. Missing parts fall back to [`PlainText`] and no styling.
///
/// # Example
///
/// ```
/// use roster_grid::cell::{CellRenderer, Formatted};
/// use roster_lib::model::{Row, Value};
///
/// let age = Formatted::new().format(|v, _| format!("{}세", v));
/// let row = Row::new(1).with("age", 32i64);
/// assert_eq!(age.render(&Value::from(32i64), &row).text, "32세");
/// ```
#[derive(Default)]
pub struct Formatted {
    format: Option<FormatFn>,
    tooltip: Option<TooltipFn>,
    style: Option<StyleFn>,
}

impl Formatted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, f: impl Fn(&Value, &Row) -> String + Send + Sync + 'static) -> Self {
        self.format = Some(Box::new(f));
        self
    }

    pub fn tooltip(
        mut self,
        f: impl Fn(&Value, &Row) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.tooltip = Some(Box::new(f));
        self
    }

    pub fn style(mut self, f: impl Fn(&Value, &Row) -> CellStyle + Send + Sync + 'static) -> Self {
        self.style = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Formatted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatted")
            .field("format", &self.format.is_some())
            .field("tooltip", &self.tooltip.is_some())
            .field("style", &self.style.is_some())
            .finish()
    }
}

impl CellRenderer for Formatted {
    fn render(&self, value: &Value, row: &Row) -> CellDisplay {
        let mut display = match &self.format {
            Some(format) => CellDisplay::text(format(value, row)),
            None => PlainText.render(value, row),
        };
        if let Some(style) = &self.style {
            display.style = style(value, row);
        }
        if let Some(tooltip) = &self.tooltip {
            display.tooltip = tooltip(value, row);
        }
        display
    }
}

/// Renderers by column key.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Box<dyn CellRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, column_key: impl Into<String>, renderer: impl CellRenderer + 'static) {
        self.renderers.insert(column_key.into(), Box::new(renderer));
    }

    pub fn with(mut self, column_key: impl Into<String>, renderer: impl CellRenderer + 'static) -> Self {
        self.register(column_key, renderer);
        self
    }

    pub fn contains(&self, column_key: &str) -> bool {
        self.renderers.contains_key(column_key)
    }

    /// Renders the `column_key` field of `row`.
    pub fn render(&self, column_key: &str, row: &Row) -> CellDisplay {
        let value = row.value(column_key);
        match self.renderers.get(column_key) {
            Some(renderer) => renderer.render(value, row),
            None => PlainText.render(value, row),
        }
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.renderers.keys().collect();
        keys.sort();
        f.debug_struct("RendererRegistry").field("columns", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::palette;

    #[test]
    fn test_plain_text_null_is_dash() {
        let row = Row::new(1);
        assert_eq!(PlainText.render(&Value::Null, &row).text, "-");
        assert_eq!(PlainText.render(&Value::from(4.5), &row).text, "4.5");
    }

    #[test]
    fn test_registry_falls_back_to_plain_text() {
        let registry = RendererRegistry::new().with(
            "status",
            Formatted::new()
                .style(|v, _| {
                    if v.as_str() == Some("active") {
                        CellStyle::new().fg(palette::SUCCESS)
                    } else {
                        CellStyle::new().fg(palette::ERROR)
                    }
                })
                .tooltip(|_, row| Some(format!("row {}", row.id))),
        );
        let row = Row::new(2).with("status", "active").with("name", "이영희");

        let status = registry.render("status", &row);
        assert_eq!(status.text, "active");
        assert_eq!(status.style.fg, Some(palette::SUCCESS));
        assert_eq!(status.tooltip.as_deref(), Some("row 2"));

        assert_eq!(registry.render("name", &row), CellDisplay::text("이영희"));
        assert_eq!(registry.render("missing", &row).text, "-");
    }
}
