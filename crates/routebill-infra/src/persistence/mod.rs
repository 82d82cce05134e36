//! Store implementations
//!
//! `FileStore` keeps every table in one JSON file; `RestStore` talks to a
//! PostgREST endpoint. Both implement the domain repository traits.

mod file_store;
mod rest_store;

pub use file_store::FileStore;
pub use rest_store::{classify_error_body, RestStore};
