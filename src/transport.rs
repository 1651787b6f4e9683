//! Transport contract consumed by the runner.
//!
//! The runner never performs network work itself. It sees a round trip only
//! through the [`Transport`] trait and the [`QueryResponse`] envelope, so an
//! HTTP client, an in-process server, and an in-memory fake are all
//! interchangeable behind the same seam.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::query::QueryRequest;

/// One application-level error reported inside a successful round trip.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ResponseError {
    /// Human-readable message from the server.
    pub message: String,
}

impl ResponseError {
    /// Create an error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The envelope a transport produces for a structurally successful round trip.
///
/// `errors` may be present-but-empty (success) or non-empty (logical failure
/// reported inside a successful round trip). The runner treats the latter the
/// same as a round-trip failure; the two stay distinguishable to the tracer.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse<T> {
    /// The response payload.
    pub data: T,
    /// Application-level errors carried alongside the payload.
    #[serde(default)]
    pub errors: Vec<ResponseError>,
}

impl<T> QueryResponse<T> {
    /// An envelope with a payload and no errors.
    pub fn ok(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// An envelope carrying application-level errors.
    pub fn with_errors(data: T, errors: Vec<ResponseError>) -> Self {
        Self { data, errors }
    }

    /// True when the error list is empty.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Failure of the round trip itself: network, serialization, server rejection.
///
/// Wraps any error type behind `anyhow::Error`, so transports can propagate
/// their own errors with the `?` operator via the blanket `From`.
#[derive(Debug, Clone)]
pub struct TransportError(Arc<anyhow::Error>);

impl TransportError {
    /// Borrow the wrapped error.
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }

    /// Attempt to downcast the wrapped error to a concrete type.
    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failed: {}", self.0)
    }
}

impl<E: Into<anyhow::Error>> From<E> for TransportError {
    fn from(err: E) -> Self {
        Self(Arc::new(err.into()))
    }
}

/// The collaborator that performs the actual round trip for a request.
///
/// Implementations live outside this crate. The runner calls `fetch` once per
/// dispatch and never retries on its own.
#[async_trait]
pub trait Transport<T>: Send + Sync + 'static {
    /// Perform one round trip for `request`.
    ///
    /// # Returns
    ///
    /// * `Ok(response)` - the round trip completed; the envelope may still
    ///   carry application-level errors
    /// * `Err(transport_error)` - the round trip itself failed
    async fn fetch(&self, request: &QueryRequest) -> Result<QueryResponse<T>, TransportError>;
}
