//! Request errors raised while normalizing search input.
//!
//! Display strings are part of the response contract and are echoed to the
//! caller unchanged.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RequestError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("ERROR: Unexpected value in request '{0}'")]
    UnknownFilter(String),

    #[error("ERROR: No search type in request")]
    MissingSearchType,

    #[error("ERROR: Unexpected search type '{0}'")]
    UnknownSearchType(String),

    #[error("ERROR: Invalid limit '{0}', expected a positive integer")]
    InvalidLimit(String),
}
