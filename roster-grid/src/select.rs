//! Searchable select control
//!
//! Closed, the control shows the current choice. Enter (or Space) opens a
//! list whose first entry is always "전체", which clears the filter. While
//! open, typed text narrows the remaining options by label and the arrow
//! keys move the highlight, wrapping at both ends.

use roster_lib::filter::FilterValue;
use roster_lib::model::SelectOption;

use crate::event::Key;
use crate::event::KeyPress;
use crate::text_input::TextEditResult;
use crate::text_input::TextInput;

/// Label of the entry that clears the filter.
pub const ALL_LABEL: &str = "전체";

/// Outcome of a key press on a [`SearchableSelect`].
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// A new filter value was chosen.
    Picked(Option<FilterValue>),
    Opened,
    Closed,
    Handled,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct SearchableSelect {
    options: Vec<SelectOption>,
    multi: bool,
    searchable: bool,
    open: bool,
    query: TextInput,
    highlight: usize,
}

impl SearchableSelect {
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self {
            options,
            multi: false,
            searchable: true,
            open: false,
            query: TextInput::default(),
            highlight: 0,
        }
    }

    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn query(&self) -> &TextInput {
        &self.query
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    /// The entries currently listed: the "all" entry first, then every
    /// option whose label contains the query, ignoring case.
    pub fn visible(&self) -> Vec<SelectOption> {
        let needle = self.query.text().to_lowercase();
        std::iter::once(SelectOption::new("", ALL_LABEL))
            .chain(
                self.options
                    .iter()
                    .filter(|o| needle.is_empty() || o.label.to_lowercase().contains(&needle))
                    .cloned(),
            )
            .collect()
    }

    /// Text shown for the current filter value.
    pub fn label_for(&self, current: Option<&FilterValue>) -> String {
        match current {
            None => ALL_LABEL.to_string(),
            Some(FilterValue::Set(values)) => values
                .iter()
                .map(|v| self.label_of(v))
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => self.label_of(&other.as_text()),
        }
    }

    fn label_of(&self, value: &str) -> String {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map_or_else(|| value.to_string(), |o| o.label.clone())
    }

    /// Whether `value` is part of the current choice.
    pub fn is_chosen(current: Option<&FilterValue>, value: &str) -> bool {
        match current {
            None => value.is_empty(),
            Some(FilterValue::Set(values)) => values.iter().any(|v| v == value),
            Some(other) => other.as_text() == value,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.query = TextInput::default();
        self.highlight = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.query = TextInput::default();
        self.highlight = 0;
    }

    pub fn handle_key(&mut self, press: KeyPress, current: Option<&FilterValue>) -> SelectOutcome {
        if !self.open {
            return match press.key {
                Key::Enter | Key::Char(' ') if press.modifiers.none() => {
                    self.open();
                    SelectOutcome::Opened
                }
                _ => SelectOutcome::Ignored,
            };
        }

        match press.key {
            Key::Escape => {
                self.close();
                SelectOutcome::Closed
            }
            Key::Up => {
                self.step(-1);
                SelectOutcome::Handled
            }
            Key::Down => {
                self.step(1);
                SelectOutcome::Handled
            }
            Key::Enter => {
                let picked = self.pick(current);
                if !self.multi || picked.is_none() {
                    self.close();
                }
                match picked {
                    Some(value) => SelectOutcome::Picked(value),
                    None => SelectOutcome::Closed,
                }
            }
            Key::Char(' ') if self.multi => match self.pick(current) {
                Some(value) => SelectOutcome::Picked(value),
                None => SelectOutcome::Handled,
            },
            Key::Tab | Key::BackTab => {
                self.close();
                SelectOutcome::Ignored
            }
            _ if self.searchable => match self.query.handle_key(press) {
                TextEditResult::Changed => {
                    self.highlight = 0;
                    SelectOutcome::Handled
                }
                TextEditResult::Handled => SelectOutcome::Handled,
                _ => SelectOutcome::Ignored,
            },
            _ => SelectOutcome::Handled,
        }
    }

    fn step(&mut self, delta: isize) {
        let count = self.visible().len();
        self.highlight = if delta < 0 {
            if self.highlight == 0 { count - 1 } else { self.highlight - 1 }
        } else {
            (self.highlight + 1) % count
        };
    }

    /// The value resulting from choosing the highlighted entry. `None` when
    /// nothing is highlighted.
    fn pick(&self, current: Option<&FilterValue>) -> Option<Option<FilterValue>> {
        let option = self.visible().into_iter().nth(self.highlight)?;
        if option.value.is_empty() {
            return Some(None);
        }
        if !self.multi {
            return Some(Some(FilterValue::Text(option.value)));
        }

        let mut values = match current {
            Some(FilterValue::Set(values)) => values.clone(),
            Some(other) => vec![other.as_text().into_owned()],
            None => Vec::new(),
        };
        match values.iter().position(|v| *v == option.value) {
            Some(i) => {
                values.remove(i);
            }
            None => values.push(option.value),
        }
        Some((!values.is_empty()).then_some(FilterValue::Set(values)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_lib::model::DEPARTMENTS;

    fn departments() -> SearchableSelect {
        SearchableSelect::new(DEPARTMENTS.iter().map(|d| SelectOption::same(*d)).collect())
    }

    fn key(select: &mut SearchableSelect, key: Key, current: Option<&FilterValue>) -> SelectOutcome {
        select.handle_key(KeyPress::plain(key), current)
    }

    #[test]
    fn test_search_narrows_options_after_all_entry() {
        let mut select = departments();
        key(&mut select, Key::Enter, None);
        key(&mut select, Key::Char('마'), None);

        let labels: Vec<String> = select.visible().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, vec![ALL_LABEL.to_string(), "마케팅팀".to_string()]);

        key(&mut select, Key::Down, None);
        assert_eq!(
            key(&mut select, Key::Enter, None),
            SelectOutcome::Picked(Some(FilterValue::text("마케팅팀")))
        );
        assert!(!select.is_open());
    }

    #[test]
    fn test_arrows_wrap_around() {
        let mut select = departments();
        key(&mut select, Key::Enter, None);
        key(&mut select, Key::Up, None);
        assert_eq!(select.highlight(), DEPARTMENTS.len());
        key(&mut select, Key::Down, None);
        assert_eq!(select.highlight(), 0);
    }

    #[test]
    fn test_all_entry_clears() {
        let current = FilterValue::text("개발팀");
        let mut select = departments();
        key(&mut select, Key::Enter, Some(&current));
        assert_eq!(key(&mut select, Key::Enter, Some(&current)), SelectOutcome::Picked(None));
        assert_eq!(select.label_for(None), ALL_LABEL);
    }

    #[test]
    fn test_multi_select_toggles_with_space() {
        let mut select = departments().multi(true);
        key(&mut select, Key::Enter, None);
        key(&mut select, Key::Down, None);
        let first = key(&mut select, Key::Char(' '), None);
        let SelectOutcome::Picked(Some(value)) = first else {
            panic!("expected a pick, got {:?}", first);
        };
        assert_eq!(value, FilterValue::set(["개발팀"]));
        assert!(select.is_open());

        assert_eq!(
            key(&mut select, Key::Char(' '), Some(&value)),
            SelectOutcome::Picked(None)
        );
    }

    #[test]
    fn test_closed_select_ignores_typing() {
        let mut select = departments();
        assert_eq!(key(&mut select, Key::Char('x'), None), SelectOutcome::Ignored);
        assert_eq!(key(&mut select, Key::Down, None), SelectOutcome::Ignored);
    }
}
