//! Error types shared by every lspwire crate.
//!
//! [`ErrorCode`] covers the JSON-RPC 2.0 reserved codes and the codes the
//! Language Server Protocol reserves on top of them. Any other integer is
//! carried through unchanged as [`ErrorCode::Custom`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Start of the range JSON-RPC reserves for implementation-defined server errors.
pub const JSONRPC_RESERVED_RANGE_START: i32 = -32099;
/// End of the range JSON-RPC reserves for implementation-defined server errors.
pub const JSONRPC_RESERVED_RANGE_END: i32 = -32000;
/// Start of the range the Language Server Protocol reserves for itself.
pub const LSP_RESERVED_RANGE_START: i32 = -32899;
/// End of the range the Language Server Protocol reserves for itself.
pub const LSP_RESERVED_RANGE_END: i32 = -32800;

/// A JSON-RPC / LSP error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ErrorCode {
    /// Invalid JSON was received (-32700).
    ParseError,
    /// The JSON sent is not a valid message object (-32600).
    InvalidRequest,
    /// The method does not exist or is not available (-32601).
    MethodNotFound,
    /// Invalid method parameters (-32602).
    InvalidParams,
    /// Internal error (-32603).
    InternalError,
    /// A request arrived before `initialize` (-32002).
    ServerNotInitialized,
    /// Catch-all code for unknown errors (-32001).
    UnknownErrorCode,
    /// A syntactically correct request failed (-32803).
    RequestFailed,
    /// The server cancelled the request (-32802).
    ServerCancelled,
    /// The document changed underneath the request (-32801).
    ContentModified,
    /// The client cancelled the request (-32800).
    RequestCancelled,
    /// Any code outside the reserved set.
    Custom(i32),
}

impl ErrorCode {
    /// Returns the integer code written on the wire.
    #[must_use]
    pub fn code(self) -> i32 {
        self.into()
    }

    /// Returns true if the code falls in a range reserved by JSON-RPC or LSP.
    #[must_use]
    pub fn is_reserved(self) -> bool {
        let code = self.code();
        (-32768..=-32600).contains(&code)
            || (JSONRPC_RESERVED_RANGE_START..=JSONRPC_RESERVED_RANGE_END).contains(&code)
            || (LSP_RESERVED_RANGE_START..=LSP_RESERVED_RANGE_END).contains(&code)
    }

    /// Short human-readable name, used in logs and CLI output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "ParseError",
            ErrorCode::InvalidRequest => "InvalidRequest",
            ErrorCode::MethodNotFound => "MethodNotFound",
            ErrorCode::InvalidParams => "InvalidParams",
            ErrorCode::InternalError => "InternalError",
            ErrorCode::ServerNotInitialized => "ServerNotInitialized",
            ErrorCode::UnknownErrorCode => "UnknownErrorCode",
            ErrorCode::RequestFailed => "RequestFailed",
            ErrorCode::ServerCancelled => "ServerCancelled",
            ErrorCode::ContentModified => "ContentModified",
            ErrorCode::RequestCancelled => "RequestCancelled",
            ErrorCode::Custom(_) => "Custom",
        }
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ServerNotInitialized => -32002,
            ErrorCode::UnknownErrorCode => -32001,
            ErrorCode::RequestFailed => -32803,
            ErrorCode::ServerCancelled => -32802,
            ErrorCode::ContentModified => -32801,
            ErrorCode::RequestCancelled => -32800,
            ErrorCode::Custom(code) => code,
        }
    }
}

impl From<i32> for ErrorCode {
    fn from(code: i32) -> Self {
        match code {
            -32700 => ErrorCode::ParseError,
            -32600 => ErrorCode::InvalidRequest,
            -32601 => ErrorCode::MethodNotFound,
            -32602 => ErrorCode::InvalidParams,
            -32603 => ErrorCode::InternalError,
            -32002 => ErrorCode::ServerNotInitialized,
            -32001 => ErrorCode::UnknownErrorCode,
            -32803 => ErrorCode::RequestFailed,
            -32802 => ErrorCode::ServerCancelled,
            -32801 => ErrorCode::ContentModified,
            -32800 => ErrorCode::RequestCancelled,
            other => ErrorCode::Custom(other),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// A protocol-level error: the payload of an error response.
#[derive(Debug, Clone, PartialEq)]
pub struct LspError {
    /// The error code.
    pub code: ErrorCode,
    /// A short description of the error.
    pub message: String,
    /// Additional information about the error.
    pub data: Option<Value>,
}

impl LspError {
    /// Creates a new error with the given code and message.
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Attaches additional data to the error.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Creates a parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    /// Creates an invalid request error (-32600).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Creates a method not found error (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            format!("Method not found: {method}"),
        )
    }

    /// Creates an invalid params error (-32602).
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    /// Creates an internal error (-32603).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Creates a server-not-initialized error (-32002).
    pub fn server_not_initialized() -> Self {
        Self::new(ErrorCode::ServerNotInitialized, "Server not initialized")
    }

    /// Creates a request-cancelled error (-32800).
    pub fn request_cancelled() -> Self {
        Self::new(ErrorCode::RequestCancelled, "Request cancelled")
    }

    /// Creates a content-modified error (-32801).
    pub fn content_modified(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ContentModified, message)
    }

    /// Creates a server-cancelled error (-32802).
    pub fn server_cancelled() -> Self {
        Self::new(ErrorCode::ServerCancelled, "Server cancelled the request")
    }

    /// Creates a request-failed error (-32803).
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RequestFailed, message)
    }
}

impl fmt::Display for LspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for LspError {}

impl From<serde_json::Error> for LspError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Syntax | Category::Eof => LspError::parse_error(err.to_string()),
            Category::Data => LspError::invalid_params(err.to_string()),
            Category::Io => LspError::internal_error(err.to_string()),
        }
    }
}

/// Result alias used across lspwire.
pub type LspResult<T> = Result<T, LspError>;
