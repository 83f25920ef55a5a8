//! Error types for the mediator.
//!
//! Errors are split by the stage that produces them: field translation,
//! filter parsing, filter translation, parameter processing, sorting, and the
//! external transport/auth collaborators. [`MediatorError`] wraps the kinds
//! that abort a request.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Boxed error returned by provider-supplied translator functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error type for a whole mediated request.
///
/// Only request-level failures end up here. Per-field and per-parameter
/// failures are downgraded to response warnings before they reach the caller.
#[derive(Error, Debug)]
pub enum MediatorError {
    /// The filter string could not be parsed, or the tree is malformed.
    #[error(transparent)]
    FilterParsing(#[from] FilterParsingError),

    /// A filter references a field the provider cannot filter on.
    #[error(transparent)]
    FilterTranslate(#[from] FilterTranslateError),

    /// A field translation failed outside the per-field result loop.
    #[error(transparent)]
    FieldTranslate(#[from] FieldTranslateError),

    /// The HTTP collaborator failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The credential collaborator failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The provider answered with a body the adapter cannot read.
    #[error("unexpected response from {service}: {message}")]
    UnexpectedResponse { service: String, message: String },
}

/// Errors raised while producing a canonical field from a provider result.
#[derive(Error, Debug)]
pub enum FieldTranslateError {
    /// No direct mapping and no translator are registered for the field.
    #[error("can't translate field '{field}' (unexpected field)")]
    UnknownField { field: String },

    /// The direct mapping points at a key the result does not contain.
    #[error("can't translate field '{field}' (missing key '{key}')")]
    MissingKey { field: String, key: String },

    /// The provider translator function failed.
    #[error("can't translate field '{field}' ({source})")]
    Translator {
        field: String,
        #[source]
        source: BoxError,
    },
}

impl FieldTranslateError {
    /// Returns the canonical field name the error refers to.
    pub fn field(&self) -> &str {
        match self {
            FieldTranslateError::UnknownField { field }
            | FieldTranslateError::MissingKey { field, .. }
            | FieldTranslateError::Translator { field, .. } => field,
        }
    }
}

/// Errors raised while parsing or walking a filter expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterParsingError {
    /// The input does not conform to the filter grammar.
    #[error("could not parse filter at position {position}: {message}")]
    Syntax { message: String, position: usize },

    /// The parse tree violates a structural invariant.
    #[error("malformed filter tree: {message}")]
    MalformedTree { message: String },
}

impl FilterParsingError {
    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        FilterParsingError::Syntax {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        FilterParsingError::MalformedTree {
            message: message.into(),
        }
    }
}

/// Errors raised while translating a filter term for a provider.
#[derive(Error, Debug)]
pub enum FilterTranslateError {
    /// No filter entry is registered for the field.
    #[error("filter for field '{field}' not supported")]
    Unsupported { field: String },

    /// The provider translator function failed.
    #[error("unexpected error processing filter for field '{field}' ({source})")]
    Translator {
        field: String,
        #[source]
        source: BoxError,
    },

    /// The two bounds of a range were mapped to different provider keys.
    #[error(
        "range filter for field '{field}' translated to different keys ('{low_key}' and '{high_key}')"
    )]
    RangeKeyMismatch {
        field: String,
        low_key: String,
        high_key: String,
    },

    /// A translator turned a single bound into a range.
    #[error("filter translator for field '{field}' returned a range for a range bound")]
    NestedRange { field: String },
}

/// A query parameter with no provider implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Parameter '{parameter}' not supported")]
pub struct UnsupportedParameterError {
    pub parameter: String,
}

impl UnsupportedParameterError {
    /// Creates a new error for the named canonical parameter.
    pub fn new(parameter: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
        }
    }
}

/// Errors raised by a provider sort translator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// The provider does not implement sorting at all.
    #[error("sorting not supported")]
    NotImplemented,

    /// The provider sorts, but not by this criterion.
    #[error("sorting criteria '{criterion}' not supported")]
    Unsupported { criterion: String },
}

/// Errors from the HTTP transport collaborator.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("request to {endpoint} failed: {message}")]
    Request {
        endpoint: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The request did not complete in time.
    #[error("request to {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// The provider answered with a non-success status.
    #[error("{endpoint} returned status {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Errors from the credential collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credentials are configured for the service and scheme.
    #[error("no {scheme} credentials configured for {service}")]
    MissingCredentials { service: String, scheme: String },
}

/// Result type alias for mediated requests.
pub type MediatorResult<T> = Result<T, MediatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_translate_error_display() {
        let err = FieldTranslateError::UnknownField {
            field: "bitdepth".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "can't translate field 'bitdepth' (unexpected field)"
        );
        assert_eq!(err.field(), "bitdepth");
    }

    #[test]
    fn test_field_translate_error_keeps_source() {
        use std::error::Error as _;

        let err = FieldTranslateError::Translator {
            field: "license".to_string(),
            source: "bad url".into(),
        };
        assert!(err.to_string().contains("bad url"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_filter_parsing_error_display() {
        let err = FilterParsingError::syntax("Expected ':'", 4);
        assert_eq!(
            err.to_string(),
            "could not parse filter at position 4: Expected ':'"
        );
    }

    #[test]
    fn test_unsupported_parameter_display() {
        let err = UnsupportedParameterError::new("page");
        assert_eq!(err.to_string(), "Parameter 'page' not supported");
    }

    #[test]
    fn test_mediator_error_from_kinds() {
        let err: MediatorError = FilterTranslateError::Unsupported {
            field: "tags".to_string(),
        }
        .into();
        assert!(matches!(err, MediatorError::FilterTranslate(_)));

        let err: MediatorError = AuthError::MissingCredentials {
            service: "Freesound".to_string(),
            scheme: "apikey".to_string(),
        }
        .into();
        assert!(matches!(err, MediatorError::Auth(_)));
        assert_eq!(
            err.to_string(),
            "no apikey credentials configured for Freesound"
        );
    }
}
