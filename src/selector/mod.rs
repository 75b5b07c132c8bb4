//! Selectors
//!
//! - `Selector`: field path to match constraint
//! - Identifier shorthand: a bare id stands for `{ "_id": id }`
//! - Conjunction: merging a chain of selectors without widening any of them

mod identifier;
mod merge;
mod types;

pub use identifier::{is_identifier, is_identifier_selector, normalize_identifier, selector_identifier};
pub use merge::conjoin;
pub use types::Selector;

/// Name of the document identifier field
pub const ID_FIELD: &str = "_id";

/// Top-level conjunction operator
pub const AND_OPERATOR: &str = "$and";
