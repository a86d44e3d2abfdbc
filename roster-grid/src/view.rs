//! Render output of the grid
//!
//! A [`GridView`] is a plain snapshot of what should be on screen. It is
//! produced by [`DataGrid::render`](crate::DataGrid::render) and drawn by
//! [`paint`](crate::paint::paint).

use roster_lib::model::Align;
use roster_lib::model::FilterKind;
use roster_lib::model::RowId;

use crate::cell::CellDisplay;
use crate::selection::HeaderCheck;

/// User-visible status texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTexts {
    /// No rows and no active filter.
    pub empty: String,
    /// No rows while a filter is active.
    pub no_match: String,
    /// No rows yet and a load in progress.
    pub loading: String,
    /// Rows on screen and a refresh in progress.
    pub refreshing: String,
}

impl Default for GridTexts {
    fn default() -> Self {
        Self {
            empty: "데이터가 없습니다.".to_string(),
            no_match: "필터 조건에 맞는 데이터가 없습니다.".to_string(),
            loading: "데이터를 불러오는 중...".to_string(),
            refreshing: "서버에서 데이터를 업데이트하는 중...".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCellView {
    pub key: String,
    pub label: String,
    pub icon: Option<String>,
    pub align: Align,
    pub width: u16,
    pub focused: bool,
}

impl HeaderCellView {
    /// Label with its icon, if any.
    pub fn caption(&self) -> String {
        match &self.icon {
            Some(icon) => format!("{} {}", icon, self.label),
            None => self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCellView {
    pub column_key: String,
    pub filter_key: String,
    pub kind: FilterKind,
    /// Current input text, or the chosen label for selects.
    pub text: String,
    pub placeholder: String,
    pub focused: bool,
    /// Cursor in characters while a text input has focus.
    pub cursor: Option<usize>,
    pub selection: Option<(usize, usize)>,
}

/// Open option list of a select control.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    /// Column the list hangs under.
    pub column: usize,
    /// Index of the control within its column.
    pub slot: usize,
    pub query: String,
    pub options: Vec<PopupOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupOption {
    pub label: String,
    pub highlighted: bool,
    pub chosen: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyRowView {
    pub id: RowId,
    pub cells: Vec<CellDisplay>,
    pub selected: bool,
    /// Row holds the keyboard cursor.
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    /// `None` when the grid has no selection column.
    pub check: Option<HeaderCheck>,
    pub headers: Vec<HeaderCellView>,
    /// Filter controls per column, stacked top to bottom.
    pub filters: Vec<Vec<FilterCellView>>,
    pub rows: Vec<BodyRowView>,
    /// Column holding the body cursor, when the body has focus.
    pub cursor_column: Option<usize>,
    /// Non-blocking notice shown above rows that are being refreshed.
    pub banner: Option<String>,
    /// Full-area message shown instead of rows.
    pub placeholder: Option<String>,
    pub tooltip: Option<String>,
    pub popup: Option<PopupView>,
}

impl GridView {
    /// Height of the filter area in lines.
    pub fn filter_height(&self) -> usize {
        self.filters.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn current_row(&self) -> Option<usize> {
        self.rows.iter().position(|r| r.current)
    }
}
