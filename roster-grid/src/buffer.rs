//! Screen cell buffer

use crate::style::CellStyle;
use crate::style::Rgb;
use crate::style::TextStyle;
use crate::style::palette;
use crate::text::char_width;

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub text: TextStyle,
    /// Right half of a double-width character.
    pub continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: palette::FG,
            bg: palette::BG,
            text: TextStyle::default(),
            continuation: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Writes `text` starting at (x, y), clipped at `max_x`.
    ///
    /// A wide character that would straddle the clip edge is replaced by a
    /// space. Returns the column after the last written cell.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: CellStyle, max_x: u16) -> u16 {
        let max_x = max_x.min(self.width);
        let mut col = x;
        for ch in text.chars() {
            let w = char_width(ch) as u16;
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > max_x {
                if col < max_x {
                    self.put_char(col, y, ' ', style);
                    col += 1;
                }
                break;
            }
            self.put_char(col, y, ch, style);
            if w == 2
                && let Some(i) = self.index(col + 1, y)
            {
                self.cells[i] = Cell {
                    ch: ' ',
                    continuation: true,
                    ..self.cells[i]
                };
                self.apply(i, style);
            }
            col += w;
        }
        col
    }

    fn put_char(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        if let Some(i) = self.index(x, y) {
            self.cells[i].ch = ch;
            self.cells[i].continuation = false;
            self.apply(i, style);
        }
    }

    fn apply(&mut self, i: usize, style: CellStyle) {
        let cell = &mut self.cells[i];
        if let Some(fg) = style.fg {
            cell.fg = fg;
        }
        if let Some(bg) = style.bg {
            cell.bg = bg;
        }
        cell.text = style.text;
    }

    /// Paints the background of a horizontal span.
    pub fn fill(&mut self, x: u16, y: u16, width: u16, bg: Rgb) {
        for col in x..x.saturating_add(width).min(self.width) {
            if let Some(i) = self.index(col, y) {
                self.cells[i].bg = bg;
            }
        }
    }

    /// The characters of row `y`, continuation cells skipped.
    pub fn line(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|c| !c.continuation)
            .map(|c| c.ch)
            .collect()
    }

    /// Cells of `self` that differ from `previous`.
    pub fn diff<'a>(&'a self, previous: &'a Buffer) -> impl Iterator<Item = (u16, u16, &'a Cell)> {
        let width = self.width as usize;
        self.cells
            .iter()
            .zip(previous.cells.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(move |(i, (cell, _))| ((i % width) as u16, (i / width) as u16, cell))
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}
