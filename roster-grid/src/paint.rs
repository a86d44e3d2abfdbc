//! Draws a [`GridView`] into a [`Buffer`]

use roster_lib::model::Align;

use crate::buffer::Buffer;
use crate::selection::HeaderCheck;
use crate::style::CellStyle;
use crate::style::palette;
use crate::text::char_width;
use crate::text::display_width;
use crate::text::fit;
use crate::view::FilterCellView;
use crate::view::GridView;
use crate::view::PopupView;

const CHECK_WIDTH: u16 = 4;
const POPUP_ROWS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

struct Columns {
    starts: Vec<u16>,
    widths: Vec<u16>,
}

impl Columns {
    fn new(view: &GridView, area: Rect) -> Self {
        let mut x = area.x.saturating_add(if view.check.is_some() { CHECK_WIDTH } else { 0 });
        let mut starts = Vec::with_capacity(view.headers.len());
        let mut widths = Vec::with_capacity(view.headers.len());
        for header in &view.headers {
            starts.push(x);
            widths.push(header.width);
            x = x.saturating_add(header.width).saturating_add(1);
        }
        Self { starts, widths }
    }
}

fn check_mark(check: HeaderCheck) -> &'static str {
    match check {
        HeaderCheck::None => "[ ]",
        HeaderCheck::Some => "[-]",
        HeaderCheck::All => "[x]",
    }
}

/// Paints the grid into `area`, clipping everything to it.
pub fn paint(view: &GridView, buf: &mut Buffer, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let columns = Columns::new(view, area);
    let max_x = area.right();
    let mut y = area.y;

    if let Some(banner) = &view.banner {
        let style = CellStyle::new().fg(palette::WARNING).bold();
        buf.put_str(area.x, y, &format!("⟳ {}", banner), style, max_x);
        y += 1;
    }

    // Header
    let header_style = CellStyle::new().bg(palette::HEADER_BG).bold();
    buf.fill(area.x, y, area.width, palette::HEADER_BG);
    if let Some(check) = view.check {
        buf.put_str(area.x, y, check_mark(check), header_style, max_x);
    }
    for (i, header) in view.headers.iter().enumerate() {
        let style = if header.focused {
            header_style.bg(palette::FOCUS_BG)
        } else {
            header_style
        };
        let text = fit(&header.caption(), header.width as usize, header.align);
        buf.put_str(columns.starts[i], y, &text, style, max_x);
    }
    y += 1;

    // Filters
    let filter_top = y;
    for slot in 0..view.filter_height() {
        if y >= area.bottom() {
            return;
        }
        for (i, cells) in view.filters.iter().enumerate() {
            if let Some(cell) = cells.get(slot) {
                paint_filter(cell, buf, columns.starts[i], y, columns.widths[i], max_x);
            }
        }
        y += 1;
    }

    if y < area.bottom() {
        buf.put_str(
            area.x,
            y,
            &"─".repeat(area.width as usize),
            CellStyle::new().fg(palette::MUTED),
            max_x,
        );
        y += 1;
    }

    let body_bottom = if view.tooltip.is_some() {
        area.bottom().saturating_sub(1)
    } else {
        area.bottom()
    };

    if let Some(placeholder) = &view.placeholder {
        if y < body_bottom {
            let line = fit(placeholder, area.width as usize, Align::Center);
            buf.put_str(area.x, y, &line, CellStyle::new().fg(palette::MUTED), max_x);
        }
    } else {
        let visible = body_bottom.saturating_sub(y) as usize;
        let first = match view.current_row() {
            Some(current) if visible > 0 && current >= visible => current + 1 - visible,
            _ => 0,
        };
        for row in view.rows.iter().skip(first).take(visible) {
            let row_bg = if row.current {
                Some(palette::CURSOR_BG)
            } else if row.selected {
                Some(palette::SELECTED_BG)
            } else {
                None
            };
            if let Some(bg) = row_bg {
                buf.fill(area.x, y, area.width, bg);
            }
            let base = CellStyle {
                bg: row_bg,
                ..CellStyle::default()
            };
            if view.check.is_some() {
                let mark = if row.selected { "[x]" } else { "[ ]" };
                buf.put_str(area.x, y, mark, base, max_x);
            }
            for (i, cell) in row.cells.iter().enumerate() {
                let Some(&start) = columns.starts.get(i) else {
                    break;
                };
                let align = view.headers.get(i).map_or(Align::Left, |h| h.align);
                let mut style = base.patch(cell.style);
                if row.current && view.cursor_column == Some(i) {
                    style = style.underline();
                }
                let text = fit(&cell.text, columns.widths[i] as usize, align);
                buf.put_str(start, y, &text, style, max_x);
            }
            y += 1;
        }
    }

    if let Some(tooltip) = &view.tooltip {
        let line = area.bottom() - 1;
        buf.put_str(area.x, line, tooltip, CellStyle::new().fg(palette::ACCENT).dim(), max_x);
    }

    if let Some(popup) = &view.popup {
        let top = filter_top + popup.slot as u16 + 1;
        let x = columns.starts.get(popup.column).copied().unwrap_or(area.x);
        paint_popup(popup, buf, Rect::new(x, top, 24, area.bottom().saturating_sub(top)), max_x);
    }
}

fn paint_filter(cell: &FilterCellView, buf: &mut Buffer, x: u16, y: u16, width: u16, max_x: u16) {
    let bg = if cell.focused { palette::FOCUS_BG } else { palette::HEADER_BG };
    buf.fill(x, y, width, bg);
    let base = CellStyle::new().bg(bg);
    let width = width as usize;

    if cell.kind.is_choice() {
        let text = fit(&format!("{} ▾", cell.text), width, Align::Left);
        buf.put_str(x, y, &text, base, max_x);
        return;
    }

    if cell.text.is_empty() && cell.cursor.is_none() {
        let text = fit(&cell.placeholder, width, Align::Left);
        buf.put_str(x, y, &text, base.fg(palette::MUTED), max_x);
        return;
    }

    let Some(cursor) = cell.cursor else {
        buf.put_str(x, y, &fit(&cell.text, width, Align::Left), base, max_x);
        return;
    };

    // Scroll so the cursor stays inside the cell.
    let chars: Vec<char> = cell.text.chars().collect();
    let mut start = 0;
    while start < cursor && chars[start..cursor].iter().map(|c| char_width(*c)).sum::<usize>() >= width {
        start += 1;
    }

    let mut col = x;
    let end = x.saturating_add(width as u16).min(max_x);
    for (i, ch) in chars.iter().enumerate().skip(start) {
        if col.saturating_add(char_width(*ch) as u16) > end {
            break;
        }
        let selected = cell.selection.is_some_and(|(a, b)| i >= a && i < b);
        let style = if i == cursor {
            base.bg(palette::ACCENT)
        } else if selected {
            base.bg(palette::SELECTED_BG)
        } else {
            base
        };
        col = buf.put_str(col, y, &ch.to_string(), style, end);
    }
    if cursor >= chars.len() && col < end {
        buf.put_str(col, y, " ", base.bg(palette::ACCENT), end);
    }
}

fn paint_popup(popup: &PopupView, buf: &mut Buffer, area: Rect, max_x: u16) {
    let right = area.right().min(max_x);
    let width = right.saturating_sub(area.x);
    if width == 0 || area.height == 0 {
        return;
    }
    let style = CellStyle::new().bg(palette::HEADER_BG);
    let mut y = area.y;

    buf.fill(area.x, y, width, palette::HEADER_BG);
    buf.put_str(area.x, y, &format!("> {}", popup.query), style.fg(palette::ACCENT), right);
    y += 1;

    let highlighted = popup.options.iter().position(|o| o.highlighted).unwrap_or(0);
    let first = highlighted.saturating_sub(POPUP_ROWS - 1);
    for option in popup.options.iter().skip(first).take(POPUP_ROWS) {
        if y >= area.bottom() {
            break;
        }
        let line_style = if option.highlighted {
            style.bg(palette::ACCENT)
        } else {
            style
        };
        buf.fill(area.x, y, width, line_style.bg.unwrap_or(palette::HEADER_BG));
        let mark = if option.chosen { "●" } else { "○" };
        let label = format!("{} {}", mark, option.label);
        let text = fit(&label, width as usize, Align::Left);
        if display_width(&text) > 0 {
            buf.put_str(area.x, y, &text, line_style, right);
        }
        y += 1;
    }
}
