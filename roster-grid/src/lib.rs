//! Terminal data grid with per-column filters
//!
//! The grid is split into pure state machines (filter store, dispatch
//! scheduler, focus tracker, selection) and a controller, [`DataGrid`],
//! that turns key presses into [`GridEvent`]s and produces a [`GridView`]
//! for the painter.

pub mod buffer;
pub mod cell;
pub mod dispatch;
pub mod event;
pub mod filter_store;
pub mod focus;
pub mod paint;
pub mod request;
pub mod select;
pub mod selection;
pub mod style;
pub mod terminal;
pub mod text;
pub mod text_input;
pub mod view;

mod grid;

pub use cell::CellDisplay;
pub use cell::CellRenderer;
pub use cell::Formatted;
pub use cell::PlainText;
pub use cell::RendererRegistry;
pub use dispatch::DispatchMode;
pub use dispatch::DispatchScheduler;
pub use event::Key;
pub use event::KeyPress;
pub use event::Modifiers;
pub use filter_store::FilterChange;
pub use filter_store::FilterStore;
pub use focus::FocusPhase;
pub use focus::FocusToken;
pub use focus::FocusTracker;
pub use grid::DEFAULT_COLUMN_WIDTH;
pub use grid::MAX_COLUMN_WIDTH;
pub use grid::DataGrid;
pub use grid::GridEvent;
pub use grid::Zone;
pub use grid::column_width;
pub use request::RequestTicket;
pub use request::RequestTracker;
pub use selection::HeaderCheck;
pub use selection::Selection;
pub use selection::SelectionChange;
pub use style::CellStyle;
pub use view::GridTexts;
pub use view::GridView;
