use std::time::Instant;

use roster_grid::DataGrid;
use roster_grid::FilterStore;
use roster_grid::GridEvent;
use roster_grid::HeaderCheck;
use roster_grid::Key;
use roster_grid::KeyPress;
use roster_grid::MAX_COLUMN_WIDTH;
use roster_grid::Modifiers;
use roster_grid::Selection;
use roster_grid::SelectionChange;
use roster_grid::Zone;
use roster_grid::buffer::Buffer;
use roster_grid::paint::Rect;
use roster_grid::paint::paint;
use roster_lib::filter::FilterValue;
use roster_lib::filter::apply;
use roster_lib::model::ColumnDescriptor;
use roster_lib::model::FilterDescriptor;
use roster_lib::model::Row;
use roster_lib::model::RowId;
use roster_lib::model::SelectOption;
use roster_lib::model::Value;
use roster_lib::model::default_columns;

fn rows() -> Vec<Row> {
    vec![
        Row::new(1).with("name", "김철수").with("department", "개발팀").with("age", 32i64),
        Row::new(2).with("name", "이영희").with("department", "디자인팀").with("age", 28i64),
        Row::new(3).with("name", "박민수").with("department", "마케팅팀").with("age", Value::Null),
    ]
}

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "이름").filter(FilterDescriptor::text("name")),
        ColumnDescriptor::new("department", "부서").filter(FilterDescriptor::select(
            "department",
            ["개발팀", "디자인팀", "마케팅팀"].map(SelectOption::same),
        )),
        ColumnDescriptor::new("age", "나이").filter(FilterDescriptor::number("age")),
    ]
}

fn press(grid: &mut DataGrid, store: &mut FilterStore, rows: &[Row], key: Key) -> Vec<GridEvent> {
    grid.handle_key(KeyPress::plain(key), store, rows, &Selection::new(), Instant::now())
}

/// Sends a key and applies any selection edits it raises to `selection`.
fn press_selecting(
    grid: &mut DataGrid,
    store: &mut FilterStore,
    rows: &[Row],
    selection: &mut Selection,
    press: KeyPress,
) -> Vec<GridEvent> {
    let events = grid.handle_key(press, store, rows, selection, Instant::now());
    for event in &events {
        if let GridEvent::Selection(change) = event {
            selection.apply(change);
        }
    }
    events
}

fn type_text(grid: &mut DataGrid, store: &mut FilterStore, rows: &[Row], text: &str) -> Vec<GridEvent> {
    text.chars()
        .flat_map(|c| press(grid, store, rows, Key::Char(c)))
        .collect()
}

#[test]
fn test_typing_updates_filter_store() {
    let rows = rows();
    let mut grid = DataGrid::new(columns());
    let mut store = FilterStore::new();

    press(&mut grid, &mut store, &rows, Key::Tab);
    assert_eq!(grid.zone(), Zone::Filter(0));

    let events = type_text(&mut grid, &mut store, &rows, "김");
    assert!(matches!(events.as_slice(), [GridEvent::FilterChanged(change)] if change.key == "name"));
    assert_eq!(store.get("name"), Some(&FilterValue::text("김")));

    let filtered = apply(&rows, store.state(), &grid.schema());
    assert_eq!(filtered.len(), 1);
}

#[test]
fn test_focus_cursor_is_clamped_after_external_change() {
    let rows = rows();
    let mut grid = DataGrid::new(columns());
    let mut store = FilterStore::new();

    press(&mut grid, &mut store, &rows, Key::Tab);
    type_text(&mut grid, &mut store, &rows, "abcde");
    press(&mut grid, &mut store, &rows, Key::Left);
    press(&mut grid, &mut store, &rows, Key::Left);
    assert_eq!(grid.focus().token().map(|t| t.cursor), Some(3));

    // Re-render with the same value keeps the offset.
    grid.sync(&store, &rows);
    let view = grid.render(&rows, &store, &Selection::new(), false);
    assert_eq!(view.filters[0][0].cursor, Some(3));

    // A shorter value clamps it.
    store.set_filter("name", Some(FilterValue::text("ab")));
    grid.sync(&store, &rows);
    let view = grid.render(&rows, &store, &Selection::new(), false);
    assert_eq!(view.filters[0][0].text, "ab");
    assert_eq!(view.filters[0][0].cursor, Some(2));
    assert_eq!(grid.zone(), Zone::Filter(0));
}

#[test]
fn test_unparsable_number_keeps_typed_text() {
    let rows = rows();
    let mut grid = DataGrid::new(columns());
    let mut store = FilterStore::new();

    press(&mut grid, &mut store, &rows, Key::BackTab);
    assert_eq!(grid.zone(), Zone::Filter(2));
    type_text(&mut grid, &mut store, &rows, "3x");
    assert_eq!(store.get("age"), None);

    grid.sync(&store, &rows);
    assert_eq!(grid.render(&rows, &store, &Selection::new(), false).filters[2][0].text, "3x");
}

#[test]
fn test_select_all_sets_exactly_rendered_ids() {
    let all = rows();
    let grid = DataGrid::new(columns());
    let mut store = FilterStore::new();
    store.set_filter("department", Some(FilterValue::text("개발팀")));
    let rendered = apply(&all, store.state(), &grid.schema());

    let mut selection = Selection::new();
    let change = DataGrid::toggle_all(&rendered, &selection);
    assert_eq!(change, SelectionChange::SelectAll(vec![RowId::from(1)]));
    selection.apply(&change);
    assert_eq!(
        grid.render(&rendered, &store, &selection, false).check,
        Some(HeaderCheck::All)
    );

    let change = DataGrid::toggle_all(&rendered, &selection);
    assert_eq!(change, SelectionChange::Clear);
    selection.apply(&change);
    assert!(selection.is_empty());
}

#[test]
fn test_body_keys_toggle_rows_and_click_cells() {
    let rows = rows();
    let mut grid = DataGrid::new(columns());
    let mut store = FilterStore::new();
    let mut selection = Selection::new();

    press(&mut grid, &mut store, &rows, Key::Down);
    assert_eq!(grid.zone(), Zone::Body);
    press(&mut grid, &mut store, &rows, Key::Down);
    let space = KeyPress::plain(Key::Char(' '));
    let events = press_selecting(&mut grid, &mut store, &rows, &mut selection, space);
    assert_eq!(events, vec![GridEvent::Selection(SelectionChange::Add(2.into()))]);
    assert_eq!(selection.ids(), vec![RowId::from(2)]);
    assert!(grid.render(&rows, &store, &selection, false).rows[1].selected);

    let events = press_selecting(&mut grid, &mut store, &rows, &mut selection, space);
    assert_eq!(events, vec![GridEvent::Selection(SelectionChange::Remove(2.into()))]);
    assert!(selection.is_empty());

    let ctrl_a = KeyPress::new(Key::Char('a'), Modifiers::ctrl());
    let events = press_selecting(&mut grid, &mut store, &rows, &mut selection, ctrl_a);
    assert_eq!(
        events,
        vec![GridEvent::Selection(SelectionChange::SelectAll(vec![1.into(), 2.into(), 3.into()]))]
    );
    assert_eq!(selection.len(), 3);

    press(&mut grid, &mut store, &rows, Key::Right);
    let events = press(&mut grid, &mut store, &rows, Key::Enter);
    assert_eq!(
        events,
        vec![
            GridEvent::CellClicked {
                row: 2.into(),
                column: "department".to_string(),
                value: Value::from("디자인팀"),
            },
            GridEvent::RowClicked(2.into()),
        ]
    );
}

#[test]
fn test_column_refresh_keeps_typed_text_and_cursor() {
    let rows = rows();
    let mut grid = DataGrid::new(columns());
    let mut store = FilterStore::new();

    press(&mut grid, &mut store, &rows, Key::BackTab);
    type_text(&mut grid, &mut store, &rows, "3x");
    grid.sync(&store, &rows);

    let mut refreshed = columns();
    refreshed[2].label = "연령".to_string();
    grid.set_columns(refreshed, &store, &rows);

    assert_eq!(grid.zone(), Zone::Filter(2));
    let view = grid.render(&rows, &store, &Selection::new(), false);
    assert_eq!(view.headers[2].label, "연령");
    assert_eq!(view.filters[2][0].text, "3x");
    assert_eq!(view.filters[2][0].cursor, Some(2));

    // Typing continues where it left off.
    type_text(&mut grid, &mut store, &rows, "0");
    assert_eq!(
        grid.render(&rows, &store, &Selection::new(), false).filters[2][0].text,
        "3x0"
    );
}

#[test]
fn test_column_refresh_moves_focus_with_its_control() {
    let rows = rows();
    let mut grid = DataGrid::new(columns());
    let mut store = FilterStore::new();

    press(&mut grid, &mut store, &rows, Key::Tab);
    type_text(&mut grid, &mut store, &rows, "김");

    let mut reordered = columns();
    reordered.rotate_left(1);
    grid.set_columns(reordered, &store, &rows);

    assert_eq!(grid.zone(), Zone::Filter(2));
    let view = grid.render(&rows, &store, &Selection::new(), false);
    assert_eq!(view.filters[2][0].filter_key, "name");
    assert_eq!(view.filters[2][0].text, "김");
    assert_eq!(view.filters[2][0].cursor, Some(1));
}

#[test]
fn test_oversized_column_width_is_clamped() {
    let rows = rows();
    let mut wide = columns();
    wide[0] = wide[0].clone().width(u16::MAX);
    wide[1] = wide[1].clone().width(u16::MAX);
    let grid = DataGrid::new(wide);
    let store = FilterStore::new();
    let view = grid.render(&rows, &store, &Selection::new(), false);
    assert_eq!(view.headers[0].width, MAX_COLUMN_WIDTH);

    let mut buf = Buffer::new(40, 8);
    paint(&view, &mut buf, Rect::new(0, 0, 40, 8));
    assert!(buf.line(0).contains("이름"));

    let mut unclamped = view.clone();
    for header in &mut unclamped.headers {
        header.width = u16::MAX;
    }
    paint(&unclamped, &mut buf, Rect::new(0, 0, 40, 8));
    assert!(buf.line(3).contains("김철수"));
}

#[test]
fn test_select_control_filters_department() {
    let rows = rows();
    let mut grid = DataGrid::new(columns());
    let mut store = FilterStore::new();

    press(&mut grid, &mut store, &rows, Key::Tab);
    press(&mut grid, &mut store, &rows, Key::Tab);
    assert_eq!(grid.zone(), Zone::Filter(1));

    press(&mut grid, &mut store, &rows, Key::Enter);
    let view = grid.render(&rows, &store, &Selection::new(), false);
    let popup = view.popup.expect("popup open");
    assert_eq!(popup.options.len(), 4);
    assert!(popup.options[0].chosen);

    type_text(&mut grid, &mut store, &rows, "디자");
    press(&mut grid, &mut store, &rows, Key::Down);
    let events = press(&mut grid, &mut store, &rows, Key::Enter);
    assert!(matches!(events.as_slice(), [GridEvent::FilterChanged(_)]));
    assert_eq!(store.get("department"), Some(&FilterValue::text("디자인팀")));

    let view = grid.render(&rows, &store, &Selection::new(), false);
    assert!(view.popup.is_none());
    assert_eq!(view.filters[1][0].text, "디자인팀");
}

#[test]
fn test_empty_and_loading_placeholders() {
    let mut grid = DataGrid::new(columns());
    let mut store = FilterStore::new();

    let view = grid.render(&[], &store, &Selection::new(), false);
    assert_eq!(view.placeholder.as_deref(), Some("데이터가 없습니다."));

    let view = grid.render(&[], &store, &Selection::new(), true);
    assert_eq!(view.placeholder.as_deref(), Some("데이터를 불러오는 중..."));
    assert_eq!(view.banner, None);

    store.set_filter("name", Some(FilterValue::text("없는사람")));
    let view = grid.render(&[], &store, &Selection::new(), false);
    assert_eq!(
        view.placeholder.as_deref(),
        Some("필터 조건에 맞는 데이터가 없습니다.")
    );

    let rows = rows();
    let view = grid.render(&rows, &store, &Selection::new(), true);
    assert_eq!(view.placeholder, None);
    assert_eq!(view.banner.as_deref(), Some("서버에서 데이터를 업데이트하는 중..."));

    grid.sync(&store, &rows);
    assert_eq!(grid.render(&rows, &store, &Selection::new(), false).filters[0][0].text, "없는사람");
}

#[test]
fn test_null_cells_render_as_dash_when_painted() {
    let rows = rows();
    let grid = DataGrid::new(columns()).selectable(false);
    let store = FilterStore::new();
    let view = grid.render(&rows, &store, &Selection::new(), false);
    assert_eq!(view.rows[2].cells[2].text, "-");
    assert_eq!(view.check, None);

    let mut buf = Buffer::new(60, 12);
    paint(&view, &mut buf, Rect::new(0, 0, 60, 12));
    assert!(buf.line(0).contains("이름"));
    assert!(buf.line(3).contains("김철수"));
    assert!(buf.line(5).contains("박민수"));
}

#[test]
fn test_employee_columns_stack_and_render() {
    let grid = DataGrid::new(default_columns());
    let store = FilterStore::new();
    let view = grid.render(&[], &store, &Selection::new(), false);
    assert_eq!(view.headers.len(), 9);
    assert_eq!(view.filter_height(), 1);
    assert!(view.filters.iter().all(|cells| cells.len() == 1));
}
