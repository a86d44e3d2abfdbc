//! Display-width aware text helpers
//!
//! Hangul and other East Asian wide characters occupy two terminal cells.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use roster_lib::model::Align;

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Cuts `s` to at most `max_width` cells, ending in `…` when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = char_width(ch);
        if width + w > target {
            break;
        }
        result.push(ch);
        width += w;
    }
    result.push('…');
    result
}

/// Truncates then pads `s` to exactly `width` cells.
pub fn fit(s: &str, width: usize, align: Align) -> String {
    let text = truncate_to_width(s, width);
    let used = display_width(&text);
    let slack = width.saturating_sub(used);
    let left = match align {
        Align::Left => 0,
        Align::Center => slack / 2,
        Align::Right => slack,
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(slack - left))
}

/// Cell offset of the character at `char_index`.
pub fn offset_of(s: &str, char_index: usize) -> usize {
    s.chars().take(char_index).map(char_width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hangul_is_double_width() {
        assert_eq!(display_width("개발팀"), 6);
        assert_eq!(display_width("abc"), 3);
    }

    #[test]
    fn test_truncate_never_splits_wide_chars() {
        assert_eq!(truncate_to_width("마케팅팀", 6), "마케…");
        assert_eq!(truncate_to_width("마케팅팀", 5), "마케…");
        assert_eq!(truncate_to_width("마케팅팀", 8), "마케팅팀");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_fit_aligns() {
        assert_eq!(fit("ab", 6, Align::Left), "ab    ");
        assert_eq!(fit("ab", 6, Align::Center), "  ab  ");
        assert_eq!(fit("ab", 6, Align::Right), "    ab");
        assert_eq!(display_width(&fit("마케팅팀", 5, Align::Center)), 5);
    }

    #[test]
    fn test_offset_of() {
        assert_eq!(offset_of("김a", 1), 2);
        assert_eq!(offset_of("김a", 2), 3);
    }
}
