//! Cell colors and text attributes

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

pub mod palette {
    use super::Rgb;

    pub const FG: Rgb = Rgb::new(230, 230, 230);
    pub const BG: Rgb = Rgb::new(16, 16, 20);
    pub const MUTED: Rgb = Rgb::new(140, 140, 150);
    pub const ACCENT: Rgb = Rgb::new(0, 123, 255);
    pub const HEADER_BG: Rgb = Rgb::new(40, 44, 52);
    pub const FOCUS_BG: Rgb = Rgb::new(60, 70, 95);
    pub const CURSOR_BG: Rgb = Rgb::new(50, 56, 70);
    pub const SELECTED_BG: Rgb = Rgb::new(35, 60, 45);
    pub const WARNING: Rgb = Rgb::new(255, 193, 7);
    pub const ERROR: Rgb = Rgb::new(220, 53, 69);
    pub const SUCCESS: Rgb = Rgb::new(40, 167, 69);
}

/// Text attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Style of one rendered cell; unset colors inherit from the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub text: TextStyle,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(mut self, color: Rgb) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Rgb) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.text.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.text.dim = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.text.underline = true;
        self
    }

    /// Layers `other` on top of `self`; set fields of `other` win.
    pub fn patch(self, other: CellStyle) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            text: TextStyle {
                bold: self.text.bold || other.text.bold,
                dim: self.text.dim || other.text.dim,
                italic: self.text.italic || other.text.italic,
                underline: self.text.underline || other.text.underline,
            },
        }
    }
}
