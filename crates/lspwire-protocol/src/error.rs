//! Decode errors.
//!
//! Every failure to turn JSON into a typed protocol value is a
//! [`DecodeError`]. Nested failures keep their path through
//! [`DecodeError::Field`] and [`DecodeError::Index`], so a message like
//! `DidChangeTextDocumentParams.contentChanges: [0]: ...` points at the
//! offending value.

use lspwire_core::{ErrorCode, LspError};
use std::fmt;

/// One failed alternative of an untagged union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Shape name of the alternative that was tried.
    pub shape: String,
    /// Why it did not decode.
    pub reason: String,
}

/// What is wrong with a response's result/error pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeProblem {
    /// Neither `result` nor `error` is present.
    Missing,
    /// Both `result` and `error` are present.
    Conflicting,
}

/// Error decoding a protocol value or message.
#[derive(Debug)]
pub enum DecodeError {
    /// The input is not valid JSON.
    Json(serde_json::Error),
    /// The JSON value has the wrong type.
    TypeMismatch {
        /// What the shape expected.
        expected: String,
        /// What was found instead.
        found: String,
    },
    /// A mandatory key is absent.
    MissingRequiredField {
        /// Shape being decoded.
        shape: String,
        /// The absent key.
        field: String,
    },
    /// A key outside the shape's declared fields is present.
    UnrecognizedField {
        /// Shape being decoded.
        shape: String,
        /// The extra key.
        field: String,
    },
    /// A field's value failed to decode.
    Field {
        /// Shape being decoded.
        shape: String,
        /// Field whose value failed.
        field: String,
        /// Underlying failure.
        source: Box<DecodeError>,
    },
    /// An array element failed to decode.
    Index {
        /// Element position.
        index: usize,
        /// Underlying failure.
        source: Box<DecodeError>,
    },
    /// A value outside a closed enumeration.
    InvalidEnumValue {
        /// Enumeration name.
        enumeration: String,
        /// The rejected wire value.
        value: String,
    },
    /// `null` given to a union that does not admit it.
    NullNotAllowed {
        /// Union shape name.
        union: String,
    },
    /// No alternative of an untagged union decoded cleanly.
    NoMatchingAlternative {
        /// Union shape name.
        union: String,
        /// Each alternative tried, in declaration order.
        attempts: Vec<Attempt>,
    },
    /// The object is not a request, notification, or response.
    InvalidMessageShape(String),
    /// The `jsonrpc` member is not `"2.0"`.
    InvalidVersion(String),
    /// A response with both or neither of `result` and `error`.
    InvalidResponseOutcome(OutcomeProblem),
    /// The method name is not in the registry.
    UnknownMethod(String),
}

impl DecodeError {
    pub(crate) fn type_mismatch(expected: impl Into<String>, found: &serde_json::Value) -> Self {
        DecodeError::TypeMismatch {
            expected: expected.into(),
            found: json_type_name(found).to_string(),
        }
    }

    pub(crate) fn in_field(self, shape: &str, field: &str) -> Self {
        DecodeError::Field {
            shape: shape.to_string(),
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn at_index(self, index: usize) -> Self {
        DecodeError::Index {
            index,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field and index context.
    #[must_use]
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Field { source, .. } | DecodeError::Index { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    /// The JSON-RPC error code a receiver should answer this failure with.
    ///
    /// Failures in the envelope itself are invalid requests; failures inside
    /// `params` (or `result`) are invalid params.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            DecodeError::Json(_) => ErrorCode::ParseError,
            DecodeError::InvalidMessageShape(_)
            | DecodeError::InvalidVersion(_)
            | DecodeError::InvalidResponseOutcome(_) => ErrorCode::InvalidRequest,
            DecodeError::UnknownMethod(_) => ErrorCode::MethodNotFound,
            DecodeError::MissingRequiredField { shape, .. }
            | DecodeError::UnrecognizedField { shape, .. }
                if is_envelope(shape) =>
            {
                ErrorCode::InvalidRequest
            }
            DecodeError::Field {
                shape,
                field,
                source,
            } if is_envelope(shape) => match field.as_str() {
                "params" | "result" => source.error_code(),
                _ => ErrorCode::InvalidRequest,
            },
            _ => ErrorCode::InvalidParams,
        }
    }
}

const ENVELOPE_SHAPES: [&str; 4] = ["Request", "Notification", "Response", "ResponseError"];

fn is_envelope(shape: &str) -> bool {
    ENVELOPE_SHAPES.contains(&shape)
}

/// Name of a JSON value's type, as used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_f64() => "decimal",
        serde_json::Value::Number(_) => "integer",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Json(e) => write!(f, "JSON error: {e}"),
            DecodeError::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            DecodeError::MissingRequiredField { shape, field } => {
                write!(f, "{shape}: missing required field `{field}`")
            }
            DecodeError::UnrecognizedField { shape, field } => {
                write!(f, "{shape}: unrecognized field `{field}`")
            }
            DecodeError::Field {
                shape,
                field,
                source,
            } => write!(f, "{shape}.{field}: {source}"),
            DecodeError::Index { index, source } => write!(f, "[{index}]: {source}"),
            DecodeError::InvalidEnumValue { enumeration, value } => {
                write!(f, "{value} is not a valid {enumeration}")
            }
            DecodeError::NullNotAllowed { union } => write!(f, "{union} cannot be null"),
            DecodeError::NoMatchingAlternative { union, attempts } => {
                let shapes: Vec<&str> = attempts.iter().map(|a| a.shape.as_str()).collect();
                write!(f, "expected one of [{}] for {union}", shapes.join(", "))?;
                for attempt in attempts {
                    write!(f, "; {}: {}", attempt.shape, attempt.reason)?;
                }
                Ok(())
            }
            DecodeError::InvalidMessageShape(reason) => write!(f, "invalid message: {reason}"),
            DecodeError::InvalidVersion(found) => {
                write!(f, "unsupported jsonrpc version {found}, expected \"2.0\"")
            }
            DecodeError::InvalidResponseOutcome(OutcomeProblem::Missing) => {
                write!(f, "response has neither result nor error")
            }
            DecodeError::InvalidResponseOutcome(OutcomeProblem::Conflicting) => {
                write!(f, "response has both result and error")
            }
            DecodeError::UnknownMethod(method) => write!(f, "unknown method: {method}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Json(e) => Some(e),
            DecodeError::Field { source, .. } | DecodeError::Index { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err)
    }
}

impl From<DecodeError> for LspError {
    fn from(err: DecodeError) -> Self {
        match err.root_cause() {
            DecodeError::UnknownMethod(method) => LspError::method_not_found(method),
            _ => LspError::new(err.error_code(), err.to_string()),
        }
    }
}
