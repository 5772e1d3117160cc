use thiserror::Error;

use crate::domain::params::errors::ParseError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Not found")]
    NotFound,

    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] ParseError),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}
