//! Filter values, filter state and row predicates

mod predicate;
mod schema;
mod state;
mod value;

pub use predicate::apply;
pub use predicate::is_all_sentinel;
pub use predicate::matches;
pub use predicate::row_matches;
pub use schema::FilterSchema;
pub use state::FilterState;
pub use value::FilterValue;
