//! Failure classification for completed fetches.

use std::fmt;

use crate::transport::{ResponseError, TransportError};

/// Why a fetch completed without a usable payload.
///
/// The runner collapses both kinds into the single error flag on
/// [`QueryState`](crate::QueryState); the split exists for observers only and
/// never reaches the consumer surface.
#[derive(Debug, Clone)]
pub enum FetchFailure {
    /// The round trip succeeded but the envelope carried errors.
    Query {
        /// The application-level errors from the response envelope.
        errors: Vec<ResponseError>,
    },
    /// The round trip itself failed.
    Transport(TransportError),
}

impl FetchFailure {
    /// True for a round-trip failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchFailure::Transport(_))
    }

    /// The application-level errors, if this was a logical failure.
    pub fn response_errors(&self) -> Option<&[ResponseError]> {
        match self {
            FetchFailure::Query { errors } => Some(errors),
            FetchFailure::Transport(_) => None,
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Query { errors } => match errors.first() {
                Some(first) => write!(f, "query failed: {}", first),
                None => write!(f, "query failed"),
            },
            FetchFailure::Transport(err) => fmt::Display::fmt(err, f),
        }
    }
}
