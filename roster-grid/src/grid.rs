//! Data grid controller
//!
//! Owns everything about the grid that is not data: filter controls, focus
//! and cursor. Rows, filter state and the selection belong to the caller and
//! are passed in on every call; selection edits come back as events.

use std::time::Instant;

use log::debug;
use log::trace;

use roster_lib::filter::FilterSchema;
use roster_lib::filter::FilterValue;
use roster_lib::model::ColumnDescriptor;
use roster_lib::model::FilterDescriptor;
use roster_lib::model::FilterKind;
use roster_lib::model::Row;
use roster_lib::model::RowId;
use roster_lib::model::Value;

use crate::cell::RendererRegistry;
use crate::event::Key;
use crate::event::KeyPress;
use crate::filter_store::FilterChange;
use crate::filter_store::FilterStore;
use crate::focus::FocusToken;
use crate::focus::FocusTracker;
use crate::select::SearchableSelect;
use crate::select::SelectOutcome;
use crate::selection::HeaderCheck;
use crate::selection::Selection;
use crate::selection::SelectionChange;
use crate::text::display_width;
use crate::text_input::TextEditResult;
use crate::text_input::TextInput;
use crate::view::BodyRowView;
use crate::view::FilterCellView;
use crate::view::GridTexts;
use crate::view::GridView;
use crate::view::HeaderCellView;
use crate::view::PopupOption;
use crate::view::PopupView;

/// Width of a column that declares none.
pub const DEFAULT_COLUMN_WIDTH: u16 = 12;

/// Widest a column may get, whatever its metadata declares.
pub const MAX_COLUMN_WIDTH: u16 = 200;

const PAGE_ROWS: usize = 10;

/// Something the grid wants its owner to know about.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    FilterChanged(FilterChange),
    /// The owner should apply this edit to its selection.
    Selection(SelectionChange),
    RowClicked(RowId),
    CellClicked {
        row: RowId,
        column: String,
        value: Value,
    },
    HeaderClicked(String),
}

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Idle,
    Header(usize),
    Filter(usize),
    Body,
}

#[derive(Debug, Clone)]
enum Widget {
    Input(TextInput),
    Select(SearchableSelect),
}

#[derive(Debug, Clone)]
struct Control {
    column: usize,
    slot: usize,
    column_key: String,
    filter: FilterDescriptor,
    widget: Widget,
}

impl Control {
    fn new(column: usize, slot: usize, column_key: &str, filter: &FilterDescriptor) -> Self {
        let widget = if filter.kind.is_choice() {
            Widget::Select(
                SearchableSelect::new(filter.options.clone())
                    .multi(filter.kind == FilterKind::MultiSelect)
                    .searchable(filter.searchable),
            )
        } else {
            Widget::Input(TextInput::default())
        };
        Self {
            column,
            slot,
            column_key: column_key.to_string(),
            filter: filter.clone(),
            widget,
        }
    }

    fn token(&self) -> FocusToken {
        let token = FocusToken::new(&self.column_key, &self.filter.key);
        match &self.widget {
            Widget::Input(input) => token.at(input.cursor()),
            Widget::Select(_) => token,
        }
    }
}

/// Column width in cells: the declared width, or enough for the caption,
/// never more than [`MAX_COLUMN_WIDTH`].
pub fn column_width(column: &ColumnDescriptor) -> u16 {
    let width = column.width.unwrap_or_else(|| {
        let icon = column.header.icon.as_deref().map_or(0, |i| display_width(i) + 1);
        let caption = display_width(&column.label) + icon + 2;
        u16::try_from(caption).unwrap_or(u16::MAX).max(DEFAULT_COLUMN_WIDTH)
    });
    width.min(MAX_COLUMN_WIDTH)
}

#[derive(Debug)]
pub struct DataGrid {
    columns: Vec<ColumnDescriptor>,
    controls: Vec<Control>,
    renderers: RendererRegistry,
    texts: GridTexts,
    selectable: bool,
    zone: Zone,
    last_control: usize,
    focus: FocusTracker,
    row_cursor: usize,
    column_cursor: usize,
}

impl DataGrid {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        let mut grid = Self {
            columns: Vec::new(),
            controls: Vec::new(),
            renderers: RendererRegistry::new(),
            texts: GridTexts::default(),
            selectable: true,
            zone: Zone::Idle,
            last_control: 0,
            focus: FocusTracker::new(),
            row_cursor: 0,
            column_cursor: 0,
        };
        grid.install_columns(columns);
        grid
    }

    pub fn with_renderers(mut self, renderers: RendererRegistry) -> Self {
        self.renderers = renderers;
        self
    }

    pub fn with_texts(mut self, texts: GridTexts) -> Self {
        self.texts = texts;
        self
    }

    /// Enables or disables the selection column.
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn schema(&self) -> FilterSchema {
        FilterSchema::from_columns(&self.columns)
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    /// The header checkbox toggle: select exactly the rendered rows, or
    /// clear when they are all selected already.
    pub fn toggle_all(rows: &[Row], selection: &Selection) -> SelectionChange {
        if selection.header_check(rows.iter().map(|r| &r.id)) == HeaderCheck::All {
            SelectionChange::Clear
        } else {
            SelectionChange::SelectAll(rows.iter().map(|r| r.id.clone()).collect())
        }
    }

    /// Replaces the columns. Inputs whose (column, filter) pair survives keep
    /// their typed text; new ones take it from `store`. Focus stays on a
    /// control that still exists.
    pub fn set_columns(&mut self, columns: Vec<ColumnDescriptor>, store: &FilterStore, rows: &[Row]) {
        let focused = self.focus.token().cloned();
        self.install_columns(columns);
        if let Some(token) = focused {
            match self.controls.iter().position(|c| token.names(&c.column_key, &c.filter.key)) {
                Some(i) => {
                    self.last_control = i;
                    if matches!(self.zone, Zone::Filter(_)) {
                        self.zone = Zone::Filter(i);
                    }
                }
                None => {
                    self.focus = FocusTracker::new();
                    if matches!(self.zone, Zone::Filter(_)) {
                        self.zone = Zone::Idle;
                    }
                }
            }
        }
        self.sync(store, rows);
    }

    fn install_columns(&mut self, columns: Vec<ColumnDescriptor>) {
        let mut previous = std::mem::take(&mut self.controls);
        self.controls = columns
            .iter()
            .enumerate()
            .flat_map(|(i, column)| {
                column
                    .active_filters()
                    .iter()
                    .enumerate()
                    .map(move |(slot, filter)| Control::new(i, slot, &column.key, filter))
                    .collect::<Vec<_>>()
            })
            .collect();
        // Inputs that survive keep their text and cursor.
        for control in &mut self.controls {
            let carried = previous.iter().position(|old| {
                matches!(old.widget, Widget::Input(_))
                    && old.column_key == control.column_key
                    && old.filter.key == control.filter.key
                    && old.filter.kind == control.filter.kind
            });
            if let Some(i) = carried {
                control.widget = previous.swap_remove(i).widget;
            }
        }
        self.columns = columns;
        self.last_control = self.last_control.min(self.controls.len().saturating_sub(1));
        self.column_cursor = self.column_cursor.min(self.columns.len().saturating_sub(1));
        if let Zone::Header(c) = self.zone
            && c >= self.columns.len()
        {
            self.zone = Zone::Idle;
        }
    }

    /// Post-render step after rows or filters changed outside the grid.
    ///
    /// Input text follows the store unless it already reads as the stored
    /// value, and the focused input gets its cursor back, clamped to the
    /// new text.
    pub fn sync(&mut self, store: &FilterStore, rows: &[Row]) {
        for control in &mut self.controls {
            let Widget::Input(input) = &mut control.widget else {
                continue;
            };
            let stored = store.get(&control.filter.key);
            if FilterValue::from_input(control.filter.kind, input.text()).as_ref() != stored {
                input.set_text(stored.map(|v| v.as_text().into_owned()).unwrap_or_default());
            }
            if self
                .focus
                .token()
                .is_some_and(|t| t.names(&control.column_key, &control.filter.key))
                && let Some((cursor, anchor)) = self.focus.restore(input.len())
            {
                input.set_cursor(cursor, anchor);
            }
        }
        self.row_cursor = self.row_cursor.min(rows.len().saturating_sub(1));
    }

    /// Advances timers. Returns `true` when something visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.focus.poll(now)
    }

    /// Next instant [`tick`](Self::tick) has work to do.
    pub fn deadline(&self) -> Option<Instant> {
        self.focus.deadline()
    }

    pub fn handle_key(
        &mut self,
        press: KeyPress,
        store: &mut FilterStore,
        rows: &[Row],
        selection: &Selection,
        now: Instant,
    ) -> Vec<GridEvent> {
        trace!("grid key {:?} in {:?}", press, self.zone);
        let mut events = Vec::new();
        match self.zone {
            Zone::Idle => self.on_idle(press, rows),
            Zone::Header(column) => self.on_header(column, press, &mut events),
            Zone::Filter(index) => self.on_filter(index, press, store, rows, now, &mut events),
            Zone::Body => self.on_body(press, rows, selection, now, &mut events),
        }
        events
    }

    fn enter_filter(&mut self, index: usize) {
        let Some(control) = self.controls.get(index) else {
            return;
        };
        self.focus.focus(control.token());
        self.zone = Zone::Filter(index);
        self.last_control = index;
    }

    fn leave_filter(&mut self, index: usize, to: Zone, now: Instant) {
        if let Some(Control {
            widget: Widget::Select(select),
            ..
        }) = self.controls.get_mut(index)
        {
            select.close();
        }
        self.focus.request_blur(now);
        self.zone = to;
    }

    fn on_idle(&mut self, press: KeyPress, rows: &[Row]) {
        match press.key {
            Key::Tab => self.enter_filter(0),
            Key::BackTab => self.enter_filter(self.controls.len().saturating_sub(1)),
            Key::Down if !rows.is_empty() => self.zone = Zone::Body,
            Key::Up if !self.columns.is_empty() => self.zone = Zone::Header(0),
            _ => {}
        }
    }

    fn on_header(&mut self, column: usize, press: KeyPress, events: &mut Vec<GridEvent>) {
        match press.key {
            Key::Left => self.zone = Zone::Header(column.saturating_sub(1)),
            Key::Right => self.zone = Zone::Header((column + 1).min(self.columns.len().saturating_sub(1))),
            Key::Enter => {
                if let Some(c) = self.columns.get(column) {
                    events.push(GridEvent::HeaderClicked(c.key.clone()));
                }
            }
            Key::Down | Key::Tab => {
                let index = self.controls.iter().position(|c| c.column == column).unwrap_or(0);
                if self.controls.is_empty() {
                    self.zone = Zone::Idle;
                } else {
                    self.enter_filter(index);
                }
            }
            Key::Escape => self.zone = Zone::Idle,
            _ => {}
        }
    }

    fn on_filter(
        &mut self,
        index: usize,
        press: KeyPress,
        store: &mut FilterStore,
        rows: &[Row],
        now: Instant,
        events: &mut Vec<GridEvent>,
    ) {
        let Some(control) = self.controls.get_mut(index) else {
            self.zone = Zone::Idle;
            return;
        };

        if let Widget::Select(select) = &mut control.widget
            && select.is_open()
        {
            let current = store.get(&control.filter.key).cloned();
            match select.handle_key(press, current.as_ref()) {
                SelectOutcome::Picked(value) => {
                    debug!("select {} picked {:?}", control.filter.key, value);
                    events.push(GridEvent::FilterChanged(store.set_filter(&control.filter.key, value)));
                    return;
                }
                SelectOutcome::Ignored => {}
                _ => return,
            }
        }

        let count = self.controls.len();
        match press.key {
            Key::Tab => return self.move_filter(index, (index + 1) % count, now),
            Key::BackTab => return self.move_filter(index, (index + count - 1) % count, now),
            Key::Escape => return self.leave_filter(index, Zone::Idle, now),
            Key::Up => {
                let column = self.controls[index].column;
                return self.leave_filter(index, Zone::Header(column), now);
            }
            Key::Down if !rows.is_empty() => return self.leave_filter(index, Zone::Body, now),
            _ => {}
        }

        let control = &mut self.controls[index];
        match &mut control.widget {
            Widget::Input(input) => match input.handle_key(press) {
                TextEditResult::Changed => {
                    let change = store.set_input(&control.filter.key, control.filter.kind, input.text());
                    self.focus.edited(input.cursor(), input.anchor());
                    events.push(GridEvent::FilterChanged(change));
                }
                TextEditResult::Handled => self.focus.moved(input.cursor(), input.anchor()),
                TextEditResult::Submitted | TextEditResult::Ignored => {}
            },
            Widget::Select(select) => {
                let current = store.get(&control.filter.key).cloned();
                select.handle_key(press, current.as_ref());
            }
        }
    }

    fn move_filter(&mut self, from: usize, to: usize, now: Instant) {
        if from == to {
            return;
        }
        self.leave_filter(from, Zone::Idle, now);
        self.enter_filter(to);
    }

    fn on_body(
        &mut self,
        press: KeyPress,
        rows: &[Row],
        selection: &Selection,
        now: Instant,
        events: &mut Vec<GridEvent>,
    ) {
        let last_row = rows.len().saturating_sub(1);
        match press.key {
            Key::Up if self.row_cursor == 0 => self.enter_filter(self.last_control),
            Key::Up => self.row_cursor -= 1,
            Key::Down => self.row_cursor = (self.row_cursor + 1).min(last_row),
            Key::PageUp => self.row_cursor = self.row_cursor.saturating_sub(PAGE_ROWS),
            Key::PageDown => self.row_cursor = (self.row_cursor + PAGE_ROWS).min(last_row),
            Key::Home => self.row_cursor = 0,
            Key::End => self.row_cursor = last_row,
            Key::Left => self.column_cursor = self.column_cursor.saturating_sub(1),
            Key::Right => {
                self.column_cursor = (self.column_cursor + 1).min(self.columns.len().saturating_sub(1))
            }
            Key::Tab => self.enter_filter(0),
            Key::BackTab => self.enter_filter(self.last_control),
            Key::Escape => {
                self.focus.request_blur(now);
                self.zone = Zone::Idle;
            }
            Key::Char('a') if press.modifiers.ctrl && self.selectable => {
                events.push(GridEvent::Selection(Self::toggle_all(rows, selection)));
            }
            Key::Char(' ') if press.modifiers.none() && self.selectable => {
                if let Some(row) = rows.get(self.row_cursor) {
                    let change = if selection.contains(&row.id) {
                        SelectionChange::Remove(row.id.clone())
                    } else {
                        SelectionChange::Add(row.id.clone())
                    };
                    events.push(GridEvent::Selection(change));
                }
            }
            Key::Enter => {
                if let (Some(row), Some(column)) = (rows.get(self.row_cursor), self.columns.get(self.column_cursor)) {
                    events.push(GridEvent::CellClicked {
                        row: row.id.clone(),
                        column: column.key.clone(),
                        value: row.value(&column.key).clone(),
                    });
                    events.push(GridEvent::RowClicked(row.id.clone()));
                }
            }
            _ => {}
        }
    }

    /// Builds the frame for `rows` under the filters in `store`.
    pub fn render(&self, rows: &[Row], store: &FilterStore, selection: &Selection, loading: bool) -> GridView {
        let headers = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| HeaderCellView {
                key: column.key.clone(),
                label: column.label.clone(),
                icon: column.header.icon.clone(),
                align: column.header.align,
                width: column_width(column),
                focused: self.zone == Zone::Header(i),
            })
            .collect();

        let mut filters: Vec<Vec<FilterCellView>> = vec![Vec::new(); self.columns.len()];
        let mut popup = None;
        for (i, control) in self.controls.iter().enumerate() {
            let focused = self.zone == Zone::Filter(i);
            let current = store.get(&control.filter.key);
            let (text, cursor, marked) = match &control.widget {
                Widget::Input(input) => (
                    input.text().to_string(),
                    focused.then_some(input.cursor()),
                    focused.then(|| input.selection()).flatten(),
                ),
                Widget::Select(select) => {
                    if focused && select.is_open() {
                        popup = Some(PopupView {
                            column: control.column,
                            slot: control.slot,
                            query: select.query().text().to_string(),
                            options: select
                                .visible()
                                .into_iter()
                                .enumerate()
                                .map(|(n, option)| PopupOption {
                                    chosen: SearchableSelect::is_chosen(current, &option.value),
                                    highlighted: n == select.highlight(),
                                    label: option.label,
                                })
                                .collect(),
                        });
                    }
                    (select.label_for(current), None, None)
                }
            };
            filters[control.column].push(FilterCellView {
                column_key: control.column_key.clone(),
                filter_key: control.filter.key.clone(),
                kind: control.filter.kind,
                text,
                placeholder: control.filter.placeholder_text(),
                focused,
                cursor,
                selection: marked,
            });
        }

        let in_body = self.zone == Zone::Body;
        let body: Vec<BodyRowView> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| BodyRowView {
                id: row.id.clone(),
                cells: self
                    .columns
                    .iter()
                    .map(|c| self.renderers.render(&c.key, row))
                    .collect(),
                selected: selection.contains(&row.id),
                current: in_body && i == self.row_cursor,
            })
            .collect();

        let placeholder = rows.is_empty().then(|| {
            if loading {
                self.texts.loading.clone()
            } else if store.has_active() {
                self.texts.no_match.clone()
            } else {
                self.texts.empty.clone()
            }
        });
        let banner = (loading && !rows.is_empty()).then(|| self.texts.refreshing.clone());

        let tooltip = match self.zone {
            Zone::Header(c) => self.columns.get(c).and_then(|c| c.header.tooltip.clone()),
            Zone::Body => body
                .get(self.row_cursor)
                .and_then(|r| r.cells.get(self.column_cursor))
                .and_then(|cell| cell.tooltip.clone()),
            _ => None,
        };

        GridView {
            check: self
                .selectable
                .then(|| selection.header_check(rows.iter().map(|r| &r.id))),
            headers,
            filters,
            rows: body,
            cursor_column: in_body.then_some(self.column_cursor),
            banner,
            placeholder,
            tooltip,
            popup,
        }
    }
}
