//! Request-driven sorting, pagination and parameter parsing.
//!
//! `domain` holds the pure logic: [`domain::sort::services::resolve`] turns an
//! untrusted sort request into an allow-listed, ordered
//! [`domain::sort::value_objects::SortSpec`]; `infrastructure` applies the
//! result to sea-orm queries.

pub mod domain;
pub mod infrastructure;
