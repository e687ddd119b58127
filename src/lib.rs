//! rkv adapter for YCSB-style benchmark harnesses.
//!
//! The harness picks a database by name through [`Registry`] and drives it
//! through the [`Client`] trait. [`RkvClient`] maps those calls onto the rkv
//! HTTP API, retrying transport failures with bounded exponential backoff.

mod client;
mod config;
mod context;
mod database;
mod error;
mod retry;
mod rkv;
mod transport;

pub use client::{Client, FieldMap};
pub use config::{Endpoint, Properties, RkvConfig, ENDPOINT_ADDRESS, REQUEST_TIMEOUT_MS};
pub use context::{Cancellation, ThreadContext};
pub use database::{CreateFn, Registry};
pub use error::{BoxError, RkvError, RkvResult};
pub use retry::{RetryPolicy, RetryingTransport, RETRY_COUNT, RETRY_INTERVAL};
pub use rkv::{render_values, RkvClient};
pub use transport::{PreparedRequest, Reply, ReqwestTransport, Transport};
