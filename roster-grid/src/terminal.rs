//! Crossterm-backed terminal with double-buffered diff flushing

use std::io::Write;
use std::io::{self};
use std::time::Duration;

use crossterm::cursor;
use crossterm::event::Event;
use crossterm::event::{self};
use crossterm::execute;
use crossterm::queue;
use crossterm::style::Attribute;
use crossterm::style::Color;
use crossterm::style::SetAttribute;
use crossterm::style::SetBackgroundColor;
use crossterm::style::SetForegroundColor;
use crossterm::terminal;

use crate::buffer::Buffer;
use crate::style::Rgb;
use crate::style::TextStyle;
use crate::text::char_width;

pub struct Terminal {
    stdout: io::Stdout,
    current: Buffer,
    previous: Buffer,
}

impl Terminal {
    /// Enters raw mode and the alternate screen.
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout,
            current: Buffer::new(width, height),
            previous: Buffer::new(width, height),
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.current.width(), self.current.height())
    }

    /// Waits up to `timeout` for input, then drains whatever else is queued.
    pub fn poll(&self, timeout: Duration) -> io::Result<Vec<Event>> {
        let mut events = Vec::new();
        if event::poll(timeout)? {
            events.push(event::read()?);
            while event::poll(Duration::ZERO)? {
                events.push(event::read()?);
            }
        }
        Ok(events)
    }

    /// Redraws the frame produced by `paint` and writes only changed cells.
    pub fn draw(&mut self, paint: impl FnOnce(&mut Buffer)) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        if width != self.current.width() || height != self.current.height() {
            self.current = Buffer::new(width, height);
            self.previous = Buffer::new(width, height);
            queue!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        }

        self.current.clear();
        paint(&mut self.current);
        self.flush_diff()?;
        std::mem::swap(&mut self.current, &mut self.previous);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut next: Option<(u16, u16)> = None;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;
        let mut text = TextStyle::default();

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        for (x, y, cell) in self.current.diff(&self.previous) {
            if cell.continuation {
                continue;
            }
            if next != Some((x, y)) {
                queue!(self.stdout, cursor::MoveTo(x, y))?;
            }
            if fg != Some(cell.fg) {
                queue!(self.stdout, SetForegroundColor(to_color(cell.fg)))?;
                fg = Some(cell.fg);
            }
            if bg != Some(cell.bg) {
                queue!(self.stdout, SetBackgroundColor(to_color(cell.bg)))?;
                bg = Some(cell.bg);
            }
            if cell.text != text {
                queue!(self.stdout, SetAttribute(Attribute::Reset))?;
                queue!(
                    self.stdout,
                    SetForegroundColor(to_color(cell.fg)),
                    SetBackgroundColor(to_color(cell.bg))
                )?;
                if cell.text.bold {
                    queue!(self.stdout, SetAttribute(Attribute::Bold))?;
                }
                if cell.text.dim {
                    queue!(self.stdout, SetAttribute(Attribute::Dim))?;
                }
                if cell.text.italic {
                    queue!(self.stdout, SetAttribute(Attribute::Italic))?;
                }
                if cell.text.underline {
                    queue!(self.stdout, SetAttribute(Attribute::Underlined))?;
                }
                text = cell.text;
            }
            write!(self.stdout, "{}", cell.ch)?;
            next = Some((x + char_width(cell.ch).max(1) as u16, y));
        }
        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
