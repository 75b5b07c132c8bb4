//! # Publications
//!
//! Named queries through a view, re-run on each poll. Polling merges the
//! stored selector with the view chain every time, so dynamic predicates
//! track current state.

mod publication;
mod registry;

pub use publication::Publication;
pub use registry::PublicationRegistry;
