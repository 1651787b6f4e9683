//! Query request description.

use serde::Serialize;

/// An opaque description of the data being requested.
///
/// A request is the query document text plus optional JSON variables, which is
/// exactly what a GraphQL-shaped transport posts over the wire. It is
/// immutable for the lifetime of the runner that owns it; fetching a
/// different document means constructing a new runner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    #[serde(rename = "query")]
    document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<serde_json::Value>,
}

impl QueryRequest {
    /// Create a request from a query document.
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            variables: None,
        }
    }

    /// Attach variables to the request.
    pub fn with_variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = Some(variables);
        self
    }

    /// The query document text.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// The variables attached to this request, if any.
    pub fn variables(&self) -> Option<&serde_json::Value> {
        self.variables.as_ref()
    }
}
