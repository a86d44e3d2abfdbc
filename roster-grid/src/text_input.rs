//! Single-line editable text with a character cursor and selection

use crate::event::Key;
use crate::event::KeyPress;

/// Outcome of feeding a key to a [`TextInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEditResult {
    /// Text was modified.
    Changed,
    /// Enter was pressed.
    Submitted,
    /// Consumed without changing text (cursor movement).
    Handled,
    /// Not an editing key.
    Ignored,
}

/// Text content plus cursor state.
///
/// `cursor` and `anchor` count characters, not bytes. A selection exists
/// while the anchor is set and differs from the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
    anchor: Option<usize>,
}

impl TextInput {
    /// Creates an input with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            anchor: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replaces the text, keeping the cursor where it was as far as the
    /// new text allows.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let len = self.len();
        self.cursor = self.cursor.min(len);
        self.anchor = self.anchor.map(|a| a.min(len));
    }

    /// Places cursor and anchor, clamped to the text length.
    pub fn set_cursor(&mut self, cursor: usize, anchor: Option<usize>) {
        let len = self.len();
        self.cursor = cursor.min(len);
        self.anchor = anchor.map(|a| a.min(len));
    }

    /// Selected character range as (start, end), start < end.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        match anchor.cmp(&self.cursor) {
            std::cmp::Ordering::Less => Some((anchor, self.cursor)),
            std::cmp::Ordering::Greater => Some((self.cursor, anchor)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn select_all(&mut self) {
        if !self.text.is_empty() {
            self.anchor = Some(0);
            self.cursor = self.len();
        }
    }

    pub fn handle_key(&mut self, press: KeyPress) -> TextEditResult {
        let mods = press.modifiers;
        match press.key {
            Key::Char('a') if mods.ctrl => {
                self.select_all();
                TextEditResult::Handled
            }
            Key::Char(c) if !mods.ctrl && !mods.alt => {
                self.insert(c);
                TextEditResult::Changed
            }
            Key::Backspace => self.delete(-1),
            Key::Delete => self.delete(1),
            Key::Left => {
                self.step(-1, mods.shift);
                TextEditResult::Handled
            }
            Key::Right => {
                self.step(1, mods.shift);
                TextEditResult::Handled
            }
            Key::Home => {
                self.jump(0, mods.shift);
                TextEditResult::Handled
            }
            Key::End => {
                self.jump(self.len(), mods.shift);
                TextEditResult::Handled
            }
            Key::Enter => TextEditResult::Submitted,
            _ => TextEditResult::Ignored,
        }
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        let (from, to) = (self.byte_at(start), self.byte_at(end));
        self.text.replace_range(from..to, "");
        self.cursor = start;
        self.anchor = None;
    }

    fn insert(&mut self, c: char) {
        if let Some((start, end)) = self.selection() {
            self.remove_range(start, end);
        }
        let at = self.byte_at(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        self.anchor = None;
    }

    fn delete(&mut self, direction: i8) -> TextEditResult {
        if let Some((start, end)) = self.selection() {
            self.remove_range(start, end);
            return TextEditResult::Changed;
        }
        self.anchor = None;
        let (start, end) = if direction < 0 {
            if self.cursor == 0 {
                return TextEditResult::Handled;
            }
            (self.cursor - 1, self.cursor)
        } else {
            if self.cursor >= self.len() {
                return TextEditResult::Handled;
            }
            (self.cursor, self.cursor + 1)
        };
        self.remove_range(start, end);
        TextEditResult::Changed
    }

    fn step(&mut self, delta: isize, extend: bool) {
        if !extend && let Some((start, end)) = self.selection() {
            self.cursor = if delta < 0 { start } else { end };
            self.anchor = None;
            return;
        }
        let target = self.cursor.saturating_add_signed(delta).min(self.len());
        self.jump(target, extend);
    }

    fn jump(&mut self, target: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;

    fn press(input: &mut TextInput, key: Key) -> TextEditResult {
        input.handle_key(KeyPress::plain(key))
    }

    #[test]
    fn test_typing_inserts_at_cursor() {
        let mut input = TextInput::new("김수");
        press(&mut input, Key::Left);
        assert_eq!(press(&mut input, Key::Char('영')), TextEditResult::Changed);
        assert_eq!(input.text(), "김영수");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_backspace_and_delete_on_multibyte_text() {
        let mut input = TextInput::new("개발팀");
        press(&mut input, Key::Backspace);
        assert_eq!(input.text(), "개발");
        press(&mut input, Key::Home);
        press(&mut input, Key::Delete);
        assert_eq!(input.text(), "발");
        press(&mut input, Key::Home);
        assert_eq!(press(&mut input, Key::Backspace), TextEditResult::Handled);
    }

    #[test]
    fn test_shift_selection_is_replaced_by_typing() {
        let mut input = TextInput::new("hello");
        input.handle_key(KeyPress::new(Key::Left, Modifiers::shift()));
        input.handle_key(KeyPress::new(Key::Left, Modifiers::shift()));
        assert_eq!(input.selection(), Some((3, 5)));
        press(&mut input, Key::Char('p'));
        assert_eq!(input.text(), "help");
        assert_eq!(input.selection(), None);
    }

    #[test]
    fn test_ctrl_a_then_backspace_clears() {
        let mut input = TextInput::new("30");
        input.handle_key(KeyPress::ctrl('a'));
        press(&mut input, Key::Backspace);
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_set_text_clamps_cursor() {
        let mut input = TextInput::new("abcde");
        input.set_cursor(3, None);
        input.set_text("ab");
        assert_eq!(input.cursor(), 2);
        input.set_text("abcdef");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_enter_submits() {
        let mut input = TextInput::new("x");
        assert_eq!(press(&mut input, Key::Enter), TextEditResult::Submitted);
        assert_eq!(press(&mut input, Key::Tab), TextEditResult::Ignored);
    }
}
