//! Small drawing helpers shared by the screens.

use roster_grid::CellStyle;
use roster_grid::buffer::Buffer;
use roster_grid::style::palette;
use roster_grid::text::char_width;
use roster_grid::text::display_width;

/// Draws a one-line input box. `cursor` is set while it has focus.
pub fn input(
    buf: &mut Buffer,
    x: u16,
    y: u16,
    width: u16,
    text: &str,
    placeholder: &str,
    cursor: Option<usize>,
) {
    let bg = if cursor.is_some() {
        palette::FOCUS_BG
    } else {
        palette::HEADER_BG
    };
    buf.fill(x, y, width, bg);
    let end = x.saturating_add(width);
    let base = CellStyle::new().bg(bg);

    if text.is_empty() && cursor.is_none() {
        buf.put_str(x + 1, y, placeholder, base.fg(palette::MUTED), end);
        return;
    }

    let mut col = x + 1;
    let chars: Vec<char> = text.chars().collect();
    let room = width.saturating_sub(2) as usize;
    let first = match cursor {
        Some(c) => {
            let mut start = 0;
            while start < c && chars[start..c].iter().map(|ch| char_width(*ch)).sum::<usize>() >= room {
                start += 1;
            }
            start
        }
        None => 0,
    };
    for (i, ch) in chars.iter().enumerate().skip(first) {
        let style = if cursor == Some(i) { base.bg(palette::ACCENT) } else { base };
        col = buf.put_str(col, y, &ch.to_string(), style, end.saturating_sub(1));
    }
    if cursor == Some(chars.len()) {
        buf.put_str(col, y, " ", base.bg(palette::ACCENT), end);
    }
}

/// Draws `text` centered within `[x, x + width)`.
pub fn centered(buf: &mut Buffer, x: u16, y: u16, width: u16, text: &str, style: CellStyle) {
    let w = display_width(text) as u16;
    let start = x + width.saturating_sub(w) / 2;
    buf.put_str(start, y, text, style, x.saturating_add(width));
}

/// A bracketed key hint such as `[^P 선택된 항목 처리]`.
pub fn button(buf: &mut Buffer, x: u16, y: u16, label: &str, style: CellStyle, max_x: u16) -> u16 {
    let end = buf.put_str(x, y, &format!(" {} ", label), style, max_x);
    end + 1
}
