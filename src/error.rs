//! Unified error type.

use thiserror::Error;

use crate::pattern::PatternError;

/// The error type returned by ghast's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. A request that
/// matches no binding is not an error either; it is
/// [`Dispatch::NotFound`](crate::Dispatch::NotFound). This type surfaces
/// startup failures: a malformed route pattern, binding to a port, or
/// accepting a connection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}
