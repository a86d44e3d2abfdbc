//! Employee table page
//!
//! Holds the page state around the grid: the unfiltered base listing, the
//! latest server-filtered listing, the filters last dispatched, the row
//! selection and the status line. The grid only proposes selection edits;
//! they land here as [`GridEvent::Selection`]. Network work is requested through [`PageCommand`]s and the
//! results come back through the `on_*` methods.

use std::time::Instant;

use chrono::NaiveDate;
use log::debug;
use log::warn;
use roster_grid::CellStyle;
use roster_grid::DataGrid;
use roster_grid::DispatchMode;
use roster_grid::DispatchScheduler;
use roster_grid::FilterStore;
use roster_grid::GridEvent;
use roster_grid::GridTexts;
use roster_grid::Key;
use roster_grid::KeyPress;
use roster_grid::RequestTicket;
use roster_grid::RequestTracker;
use roster_grid::Selection;
use roster_grid::buffer::Buffer;
use roster_grid::paint::Rect;
use roster_grid::paint::paint;
use roster_grid::style::palette;
use roster_lib::api::Listing;
use roster_lib::error::Error as ClientError;
use roster_lib::filter::FilterState;
use roster_lib::filter::apply;
use roster_lib::model::ColumnDescriptor;
use roster_lib::model::Row;
use roster_lib::model::RowId;
use roster_lib::model::Value;
use roster_lib::model::default_columns;

use crate::format::employee_renderers;
use crate::widgets;

/// Work the page needs done outside itself.
#[derive(Debug, Clone, PartialEq)]
pub enum PageCommand {
    FetchColumns,
    /// The unfiltered listing.
    FetchBase,
    FetchFiltered(RequestTicket),
    Logout,
}

#[derive(Debug)]
pub struct TablePage {
    grid: DataGrid,
    store: FilterStore,
    scheduler: DispatchScheduler,
    tracker: RequestTracker,
    selection: Selection,
    /// Filters the rows on screen were produced with.
    applied: FilterState,
    base: Vec<Row>,
    base_loading: bool,
    filtered: Option<Vec<Row>>,
    error: Option<String>,
    status: Option<String>,
    show_debug: bool,
}

impl TablePage {
    pub fn new(mode: DispatchMode, today: NaiveDate) -> Self {
        let texts = GridTexts {
            empty: "직원 데이터가 없습니다.".to_string(),
            loading: "직원 데이터를 불러오는 중...".to_string(),
            ..GridTexts::default()
        };
        Self {
            grid: DataGrid::new(default_columns())
                .with_renderers(employee_renderers(today))
                .with_texts(texts),
            store: FilterStore::new(),
            scheduler: DispatchScheduler::new(mode),
            tracker: RequestTracker::new(),
            selection: Selection::new(),
            applied: FilterState::new(),
            base: Vec::new(),
            base_loading: true,
            filtered: None,
            error: None,
            status: None,
            show_debug: false,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Requests to issue when the page is first shown.
    pub fn mount(&self) -> Vec<PageCommand> {
        vec![PageCommand::FetchColumns, PageCommand::FetchBase]
    }

    /// Drops filters, pending dispatches and in-flight requests when the
    /// page is torn down, so a listing arriving late finds nothing to update.
    pub fn unmount(&mut self) {
        self.store.reset();
        self.scheduler.cancel();
        self.tracker.cancel();
        self.applied = FilterState::new();
        self.filtered = None;
        self.selection.clear();
    }

    pub fn mode(&self) -> DispatchMode {
        self.scheduler.mode()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn grid(&self) -> &DataGrid {
        &self.grid
    }

    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Rows on screen.
    pub fn rows(&self) -> Vec<Row> {
        match self.scheduler.mode() {
            DispatchMode::Local => apply(&self.base, &self.applied, &self.grid.schema()),
            DispatchMode::Remote if self.applied.has_active() => {
                self.filtered.clone().unwrap_or_default()
            }
            DispatchMode::Remote => self.base.clone(),
        }
    }

    pub fn loading(&self) -> bool {
        self.base_loading
            || (self.scheduler.mode() == DispatchMode::Remote
                && self.applied.has_active()
                && self.tracker.in_flight())
    }

    /// Earliest instant [`tick`](Self::tick) has work to do.
    pub fn deadline(&self) -> Option<Instant> {
        match (self.scheduler.deadline(), self.grid.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn tick(&mut self, now: Instant) -> Vec<PageCommand> {
        self.grid.tick(now);
        match self.scheduler.poll(now) {
            Some(state) => self.dispatch(state),
            None => Vec::new(),
        }
    }

    pub fn handle_key(&mut self, press: KeyPress, now: Instant) -> Vec<PageCommand> {
        if press.modifiers.ctrl {
            match press.key {
                Key::Char('t') => return self.toggle_mode(),
                Key::Char('p') => {
                    self.process_selected();
                    return Vec::new();
                }
                Key::Char('u') => {
                    self.selection.clear();
                    self.status = None;
                    return Vec::new();
                }
                Key::Char('d') => {
                    self.show_debug = !self.show_debug;
                    return Vec::new();
                }
                Key::Char('l') => return vec![PageCommand::Logout],
                _ => {}
            }
        }

        let rows = self.rows();
        let events = self.grid.handle_key(press, &mut self.store, &rows, &self.selection, now);
        let mut commands = Vec::new();
        let mut cell_message = None;
        for event in events {
            match event {
                GridEvent::FilterChanged(change) => {
                    if let Some(state) = self.scheduler.schedule(change.state.active_state(), now) {
                        commands.extend(self.dispatch(state));
                    }
                }
                GridEvent::Selection(change) => {
                    debug!("selection: {:?}", change);
                    self.selection.apply(&change);
                }
                GridEvent::CellClicked { row, column, value } => {
                    debug!("cell click: {} {} {:?}", row, column, value);
                    cell_message = Some(self.cell_message(&column, &value, &rows, &row));
                }
                GridEvent::RowClicked(id) => {
                    self.status = Some(match cell_message.take() {
                        Some(message) => format!("{} (행 {})", message, id),
                        None => format!("행 클릭: {}", id),
                    });
                }
                GridEvent::HeaderClicked(key) => {
                    self.status = self
                        .grid
                        .columns()
                        .iter()
                        .find(|c| c.key == key)
                        .map(|c| match &c.header.tooltip {
                            Some(tooltip) => format!("{}: {}", c.label, tooltip),
                            None => c.label.clone(),
                        });
                }
            }
        }
        self.sync();
        commands
    }

    fn cell_message(&self, column: &str, value: &Value, rows: &[Row], id: &RowId) -> String {
        if column == "name" {
            let name = rows
                .iter()
                .find(|r| &r.id == id)
                .map_or_else(|| value.to_match_string(), |r| r.value("name").to_match_string());
            return format!("{}의 상세 정보를 보여줍니다.", name);
        }
        let label = self
            .grid
            .columns()
            .iter()
            .find(|c| c.key == column)
            .map_or(column, |c| c.label.as_str());
        format!("셀 클릭: {} = {}", label, value.to_match_string())
    }

    /// Applies a dispatched filter state in the current mode.
    fn dispatch(&mut self, state: FilterState) -> Vec<PageCommand> {
        self.applied = state;
        match self.scheduler.mode() {
            DispatchMode::Local => Vec::new(),
            DispatchMode::Remote if self.applied.has_active() => {
                let ticket = self.tracker.issue(self.applied.clone());
                debug!("remote filter #{}: {}", ticket.generation, self.applied.to_query_string());
                vec![PageCommand::FetchFiltered(ticket)]
            }
            DispatchMode::Remote => {
                self.tracker.cancel();
                self.filtered = None;
                Vec::new()
            }
        }
    }

    /// Flips between in-process and server filtering. A pending debounced
    /// change is dropped; the filters last dispatched carry over.
    fn toggle_mode(&mut self) -> Vec<PageCommand> {
        let next = match self.scheduler.mode() {
            DispatchMode::Local => DispatchMode::Remote,
            DispatchMode::Remote => DispatchMode::Local,
        };
        self.scheduler.set_mode(next);
        self.tracker.cancel();
        let commands = self.dispatch(self.applied.clone());
        self.sync();
        commands
    }

    fn process_selected(&mut self) {
        let ids = self.selection.ids();
        if ids.is_empty() {
            return;
        }
        let joined = ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        self.status = Some(format!("선택된 ID: {}", joined));
    }

    fn sync(&mut self) {
        let rows = self.rows();
        self.grid.sync(&self.store, &rows);
    }

    pub fn on_columns(&mut self, result: Result<Vec<ColumnDescriptor>, ClientError>) {
        match result {
            Ok(columns) if !columns.is_empty() => {
                let rows = self.rows();
                self.grid.set_columns(columns, &self.store, &rows);
            }
            Ok(_) => warn!("server sent no columns, keeping defaults"),
            Err(e) => warn!("column metadata unavailable: {}", e),
        }
    }

    pub fn on_base(&mut self, result: Result<Listing, ClientError>) {
        self.base_loading = false;
        match result {
            Ok(listing) => {
                debug!("base listing: {} rows", listing.total);
                self.base = listing.data;
                self.error = None;
            }
            Err(e) => self.error = Some(e.user_message()),
        }
        self.sync();
    }

    pub fn on_filtered(&mut self, ticket: RequestTicket, result: Result<Listing, ClientError>) {
        if !self.tracker.accept(&ticket) {
            return;
        }
        match result {
            Ok(listing) => {
                debug!("filtered listing #{}: {} rows", ticket.generation, listing.total);
                self.filtered = Some(listing.data);
                self.error = None;
            }
            Err(e) => {
                self.filtered = None;
                self.error = Some(e.user_message());
            }
        }
        self.sync();
    }

    pub fn paint(&self, buf: &mut Buffer, area: Rect) {
        if area.height < 8 {
            return;
        }
        let max_x = area.right();
        let mut y = area.y;

        // App bar
        buf.fill(area.x, y, area.width, palette::HEADER_BG);
        buf.put_str(
            area.x + 1,
            y,
            "직원 관리 시스템",
            CellStyle::new().bg(palette::HEADER_BG).bold(),
            max_x,
        );
        let logout = " ^L 로그아웃 ";
        let logout_x = max_x.saturating_sub(logout.chars().count() as u16 + 3);
        buf.put_str(logout_x, y, logout, CellStyle::new().bg(palette::ERROR).bold(), max_x);
        y += 2;

        buf.put_str(area.x + 1, y, "직원 관리 테이블", CellStyle::new().bold(), max_x);
        y += 1;

        let selected = self.selection.len();
        buf.put_str(area.x + 1, y, &format!("선택된 행: {}개", selected), CellStyle::new(), max_x);
        let internal = self.scheduler.mode() == DispatchMode::Local;
        let toggle = format!(
            "[{}] 내부 필터링 (^T)  {}",
            if internal { "x" } else { " " },
            if internal {
                "클라이언트에서 필터링"
            } else {
                "서버에서 필터링"
            }
        );
        let toggle_x = max_x.saturating_sub(roster_grid::text::display_width(&toggle) as u16 + 1);
        buf.put_str(toggle_x, y, &toggle, CellStyle::new().fg(palette::MUTED), max_x);
        y += 1;

        if selected > 0 {
            let x = widgets::button(
                buf,
                area.x + 1,
                y,
                "^P 선택된 항목 처리",
                CellStyle::new().bg(palette::ACCENT),
                max_x,
            );
            widgets::button(buf, x, y, "^U 선택 해제", CellStyle::new().bg(palette::MUTED), max_x);
        }
        y += 1;

        if let Some(error) = &self.error {
            buf.put_str(area.x + 1, y, error, CellStyle::new().fg(palette::ERROR), max_x);
        } else if let Some(status) = &self.status {
            buf.put_str(area.x + 1, y, status, CellStyle::new().fg(palette::ACCENT), max_x);
        }
        y += 1;

        let footer = 1;
        let debug_lines = if self.show_debug { 2 } else { 0 };
        let grid_height = area.bottom().saturating_sub(y + footer + debug_lines);
        let rows = self.rows();
        let view = self.grid.render(&rows, &self.store, &self.selection, self.loading());
        paint(&view, buf, Rect::new(area.x, y, area.width, grid_height));
        y += grid_height;

        if self.show_debug {
            let ids = serde_json::to_string(&self.selection.ids()).unwrap_or_default();
            let filters = serde_json::to_string(self.store.state()).unwrap_or_default();
            let style = CellStyle::new().fg(palette::MUTED);
            buf.put_str(area.x + 1, y, &format!("현재 선택된 행: {}", ids), style, max_x);
            buf.put_str(area.x + 1, y + 1, &format!("현재 필터: {}", filters), style, max_x);
            y += 2;
        }

        let help = "Tab 필터 · ↓ 목록 · Space 선택 · ^A 전체 선택 · Enter 클릭 · ^D 디버그 · ^Q 종료";
        buf.put_str(area.x + 1, y, help, CellStyle::new().fg(palette::MUTED).dim(), max_x);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use roster_grid::Modifiers;
    use roster_grid::dispatch::QUIET_PERIOD;
    use roster_lib::filter::FilterValue;

    use super::*;

    fn employees() -> Vec<Row> {
        [
            (1i64, "김철수", "개발팀", 32i64),
            (2, "이영희", "디자인팀", 28),
            (3, "박민수", "마케팅팀", 35),
            (4, "정수진", "개발팀", 25),
        ]
        .into_iter()
        .map(|(id, name, department, age)| {
            Row::new(id)
                .with("name", name)
                .with("department", department)
                .with("age", age)
        })
        .collect()
    }

    fn loaded(mode: DispatchMode) -> TablePage {
        let mut page = TablePage::new(mode, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        page.on_base(Ok(Listing::new(employees())));
        page
    }

    fn type_text(page: &mut TablePage, text: &str, now: Instant) -> Vec<PageCommand> {
        text.chars()
            .flat_map(|c| page.handle_key(KeyPress::plain(Key::Char(c)), now))
            .collect()
    }

    #[test]
    fn test_local_mode_filters_base_immediately() {
        let mut page = loaded(DispatchMode::Local);
        let now = Instant::now();
        page.handle_key(KeyPress::plain(Key::Tab), now);
        let commands = type_text(&mut page, "김", now);
        assert!(commands.is_empty());
        let ids: Vec<RowId> = page.rows().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RowId::from(1i64)]);
    }

    #[test]
    fn test_remote_mode_debounces_then_fetches() {
        let mut page = loaded(DispatchMode::Remote);
        let start = Instant::now();
        page.handle_key(KeyPress::plain(Key::Tab), start);
        assert!(type_text(&mut page, "김철", start).is_empty());
        assert_eq!(page.rows().len(), 4);
        assert!(page.tick(start + Duration::from_millis(100)).is_empty());

        let commands = page.tick(start + QUIET_PERIOD);
        let [PageCommand::FetchFiltered(ticket)] = commands.as_slice() else {
            panic!("expected one fetch, got {:?}", commands);
        };
        assert_eq!(ticket.criteria.get("name"), Some(&FilterValue::text("김철")));
        assert!(page.loading());
        assert!(page.rows().is_empty());

        page.on_filtered(ticket.clone(), Ok(Listing::new(employees()[..1].to_vec())));
        assert!(!page.loading());
        assert_eq!(page.rows().len(), 1);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut page = loaded(DispatchMode::Remote);
        let start = Instant::now();
        page.handle_key(KeyPress::plain(Key::Tab), start);
        type_text(&mut page, "김", start);
        let first = page.tick(start + QUIET_PERIOD);
        type_text(&mut page, "철", start + QUIET_PERIOD);
        let second = page.tick(start + QUIET_PERIOD * 2);

        let (Some(PageCommand::FetchFiltered(old)), Some(PageCommand::FetchFiltered(new))) =
            (first.first(), second.first())
        else {
            panic!("expected two fetches");
        };
        page.on_filtered(old.clone(), Ok(Listing::new(employees())));
        assert!(page.rows().is_empty());
        page.on_filtered(new.clone(), Ok(Listing::new(employees()[..1].to_vec())));
        assert_eq!(page.rows().len(), 1);
    }

    #[test]
    fn test_toggle_drops_pending_change() {
        let mut page = loaded(DispatchMode::Remote);
        let start = Instant::now();
        page.handle_key(KeyPress::plain(Key::Tab), start);
        type_text(&mut page, "김", start);

        let commands = page.handle_key(KeyPress::new(Key::Char('t'), Modifiers::ctrl()), start);
        assert!(commands.is_empty());
        assert_eq!(page.mode(), DispatchMode::Local);
        assert!(page.tick(start + QUIET_PERIOD * 2).is_empty());
        assert_eq!(page.rows().len(), 4);
    }

    #[test]
    fn test_listing_failure_keeps_filters_and_selection() {
        let mut page = loaded(DispatchMode::Local);
        let now = Instant::now();
        page.handle_key(KeyPress::plain(Key::Down), now);
        page.handle_key(KeyPress::plain(Key::Char(' ')), now);
        page.on_base(Err(roster_lib::error::ApiError::http(500, "boom").into()));

        assert_eq!(page.error(), Some("boom"));
        assert_eq!(page.selection().len(), 1);
        assert_eq!(page.rows().len(), 4);
    }

    #[test]
    fn test_process_selected_and_name_click() {
        let mut page = loaded(DispatchMode::Local);
        let now = Instant::now();
        page.handle_key(KeyPress::plain(Key::Down), now);
        page.handle_key(KeyPress::plain(Key::Enter), now);
        assert_eq!(page.status(), Some("김철수의 상세 정보를 보여줍니다. (행 1)"));

        page.handle_key(KeyPress::new(Key::Char('a'), Modifiers::ctrl()), now);
        page.handle_key(KeyPress::new(Key::Char('p'), Modifiers::ctrl()), now);
        assert_eq!(page.status(), Some("선택된 ID: 1, 2, 3, 4"));

        page.handle_key(KeyPress::new(Key::Char('u'), Modifiers::ctrl()), now);
        assert!(page.selection().is_empty());
    }

    #[test]
    fn test_selection_changes_only_through_grid_events() {
        let mut page = loaded(DispatchMode::Local);
        let now = Instant::now();
        page.handle_key(KeyPress::plain(Key::Down), now);
        page.handle_key(KeyPress::plain(Key::Down), now);
        page.handle_key(KeyPress::plain(Key::Char(' ')), now);
        assert_eq!(page.selection().ids(), vec![RowId::from(2i64)]);

        // Narrowing the rows leaves the selected id in place.
        page.handle_key(KeyPress::plain(Key::Tab), now);
        type_text(&mut page, "김", now);
        assert_eq!(page.rows().len(), 1);
        assert_eq!(page.selection().ids(), vec![RowId::from(2i64)]);

        // Toggle all covers only what is rendered.
        page.handle_key(KeyPress::plain(Key::Down), now);
        page.handle_key(KeyPress::new(Key::Char('a'), Modifiers::ctrl()), now);
        assert_eq!(page.selection().ids(), vec![RowId::from(1i64)]);

        page.on_base(Ok(Listing::new(employees()[..2].to_vec())));
        assert_eq!(page.selection().ids(), vec![RowId::from(1i64)]);
    }

    #[test]
    fn test_unmount_discards_filters_and_late_responses() {
        let mut page = loaded(DispatchMode::Remote);
        let start = Instant::now();
        page.handle_key(KeyPress::plain(Key::Tab), start);
        type_text(&mut page, "김", start);
        let commands = page.tick(start + QUIET_PERIOD);
        let Some(PageCommand::FetchFiltered(ticket)) = commands.first() else {
            panic!("expected a fetch, got {:?}", commands);
        };
        type_text(&mut page, "철", start + QUIET_PERIOD);

        page.unmount();
        assert!(!page.store().has_active());
        assert!(page.tick(start + QUIET_PERIOD * 3).is_empty());
        assert!(!page.loading());

        page.on_filtered(ticket.clone(), Ok(Listing::new(Vec::new())));
        assert_eq!(page.rows().len(), 4);
    }
}
