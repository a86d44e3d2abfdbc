//! Data model

mod column;
mod directory;
mod row;
mod value;

pub use column::*;
pub use directory::DEPARTMENTS;
pub use directory::LOCATIONS;
pub use directory::STATUSES;
pub use directory::default_columns;
pub use row::*;
pub use value::*;
