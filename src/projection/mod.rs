//! Field projections
//!
//! Mongo-style include (`1`) / exclude (`0`) maps, and the rules for
//! merging a chain of them without ever resurrecting an excluded field.

mod merge;
mod types;

pub use merge::{merge_pair, merge_projections, ProjectionFold};
pub use types::{covers, FieldMode, Projection};
