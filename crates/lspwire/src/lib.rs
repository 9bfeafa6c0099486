//! lspwire: strict LSP JSON-RPC messages for Rust.
//!
//! Decodes Language Server Protocol traffic into typed values, rejecting
//! anything that does not match the protocol exactly: missing required
//! fields, unknown keys, wrong `jsonrpc` versions, responses with both or
//! neither of `result` and `error`, and request methods sent as
//! notifications.
//!
//! # Quick Start
//!
//! ```
//! use lspwire::prelude::*;
//!
//! let dispatcher = Dispatcher::new(DispatchConfig::default());
//! let bytes = br#"{"jsonrpc":"2.0","method":"$/cancelRequest","params":{"id":4}}"#;
//!
//! match dispatcher.decode(bytes) {
//!     Ok(Incoming::Notification { params: NotificationParams::Cancel(cancel) }) => {
//!         assert_eq!(cancel.id, OneOf2::A(4));
//!     }
//!     Ok(other) => panic!("unexpected message: {other:?}"),
//!     Err(err) => {
//!         if let Some(reply) = err.to_response() {
//!             let _ = lspwire::serde_json::to_string(&reply);
//!         }
//!     }
//! }
//! ```
//!
//! # Crates
//!
//! - [`lspwire_core`]: error codes, logging targets, configuration
//! - [`lspwire_protocol`]: envelopes, unions, registry, dispatch

#![forbid(unsafe_code)]

pub use lspwire_core::{
    DispatchConfig, ErrorCode, LoggingConfig, LspError, LspResult, UnknownNotificationPolicy,
    config, logging,
};
pub use lspwire_protocol::{
    Attempt, Completion, CorrelationError, DecodeError, Direction, Dispatcher, Incoming,
    IncomingError, JSONRPC_VERSION, LspNotification, LspRequest, Message, MessageShape,
    MethodEntry, MethodKind, MethodRegistry, Notification, NotificationParams, NullableOneOf2,
    NullableOneOf3, NullableOneOf4, NullableOneOf5, OneOf2, OneOf3, OneOf4, OneOf5, Outcome,
    OutcomeProblem, PendingRequests, Request, RequestId, RequestParams, RequestState, Response,
    ResponseError, ResponseResult, StrictDecode, Tuple, catalog, methods, strict,
};
pub use serde_json;

/// The types most programs need.
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::methods::{notifications, requests};
    pub use crate::{
        Completion, DecodeError, DispatchConfig, Dispatcher, ErrorCode, Incoming, IncomingError,
        LspError, LspNotification, LspRequest, Message, MethodKind, Notification,
        NotificationParams, NullableOneOf2, NullableOneOf3, OneOf2, OneOf3, PendingRequests,
        Request, RequestId, RequestParams, Response, ResponseError, ResponseResult, StrictDecode,
    };
}
