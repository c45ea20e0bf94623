//! The OData protocol error taxonomy.
//!
//! A small closed set of factory-constructed error kinds, each pinned to an
//! HTTP status. This is the only failure vocabulary components above the
//! metadata layer may use; nothing else invents status codes.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ODataError>;

/// A protocol-level failure, terminal for the request that raised it.
///
/// Created at the failure site through one of the factory constructors and
/// propagated unchanged up through parser, metadata resolution and dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ODataError {
    message: String,
    status_code: u16,
    error_code: Option<String>,
}

impl ODataError {
    fn new(message: impl Into<String>, status_code: u16, error_code: Option<String>) -> Self {
        assert!(
            (100..=599).contains(&status_code),
            "status code must be a valid HTTP status"
        );
        Self {
            message: message.into(),
            status_code,
            error_code,
        }
    }

    /// HTTP 400 for malformed or unresolvable query syntax.
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::bad_request(message)
    }

    /// HTTP 400.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, 400, None)
    }

    /// HTTP 404 for a URI segment with no corresponding resource.
    pub fn resource_not_found(segment: impl AsRef<str>) -> Self {
        Self::new(
            format!(
                "Resource not found for the segment '{}'.",
                segment.as_ref()
            ),
            404,
            None,
        )
    }

    /// HTTP 404 with a caller-supplied message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, 404, None)
    }

    /// HTTP 403.
    pub fn forbidden() -> Self {
        Self::new("Forbidden.", 403, None)
    }

    /// HTTP 406.
    pub fn not_acceptable(message: impl Into<String>) -> Self {
        Self::new(message, 406, None)
    }

    /// HTTP 412 for a failed conditional-request precondition.
    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::new(message, 412, None)
    }

    /// HTTP 500.
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(message, 500, None)
    }

    /// HTTP 501 for a facility this engine does not provide.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(message, 501, None)
    }

    /// Attach a machine-oriented error code.
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    /// Render the wire error payload handed to the transport layer.
    ///
    /// Shape follows the OData JSON error contract:
    /// `{"odata.error": {"code": ..., "message": {"value": ...}}}`.
    pub fn to_json_payload(&self) -> String {
        let body = serde_json::json!({
            "odata.error": {
                "code": self.error_code.as_deref().unwrap_or(""),
                "message": {
                    "lang": "en-US",
                    "value": self.message,
                },
            }
        });
        body.to_string()
    }
}
