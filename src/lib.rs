//! collview - scoped views over a document collection
//!
//! A view narrows a collection, or another view, by a selector and an
//! optional field projection. Every read and write through a view is
//! confined to the documents and fields the whole chain allows.

pub mod cli;
pub mod observability;
pub mod projection;
pub mod publish;
pub mod selector;
pub mod store;
pub mod view;
