//! axum bindings: query-string decoding, an extractor, and the mapping from
//! parse failures to HTTP responses.

pub mod application;
pub mod args;
