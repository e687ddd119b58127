use reqwest::StatusCode;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type RkvResult<T> = std::result::Result<T, RkvError>;

/// Failures surfaced by the rkv adapter.
///
/// Only `Transport` is ever retried; every other variant is returned on the
/// attempt that produced it.
#[derive(Error, Debug)]
pub enum RkvError {
    /// The HTTP exchange could not be completed, even after retrying.
    #[error("transport error after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: BoxError,
    },

    /// The remote store answered with a status other than the one expected.
    #[error("unexpected status code: expected {expected}, got {actual}")]
    Protocol {
        expected: StatusCode,
        actual: StatusCode,
    },

    /// The request body could not be serialized.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("{operation} is not supported")]
    Unsupported { operation: &'static str },

    /// The caller's context was cancelled before the operation completed.
    #[error("cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },

    #[error("configuration error: {message}")]
    Config { message: String },
}
