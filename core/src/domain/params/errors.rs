use thiserror::Error;

use super::value_objects::ParamValue;

/// Wraps any failure raised while coercing a request parameter, so callers
/// handle one error kind whichever parser failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Error while parsing: {value} ({original_message})")]
pub struct ParseError {
    pub original_message: String,
    pub value: ParamValue,
}

impl ParseError {
    pub fn new(original_message: impl Into<String>, value: ParamValue) -> Self {
        Self {
            original_message: original_message.into(),
            value,
        }
    }

    /// Builds an error without an underlying cause; the original message
    /// falls back to the generic one.
    pub fn for_value(value: ParamValue) -> Self {
        Self {
            original_message: format!("Error while parsing: {value}"),
            value,
        }
    }
}
