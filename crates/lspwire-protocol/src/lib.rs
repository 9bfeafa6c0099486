//! LSP message encoding for lspwire.
//!
//! This crate turns raw JSON into typed Language Server Protocol messages
//! and back:
//! - [`jsonrpc`]: request, notification, and response envelopes
//! - [`strict`]: decoding with required-field and unknown-field checks
//! - [`union`]: untagged "one of" types decoded by trial
//! - [`registry`]: the method name table
//! - [`methods`]: the params/result type of every method
//! - [`dispatch`]: classify and decode one incoming message
//! - [`correlation`]: type responses by their pending request
//! - [`catalog`]: the payload structures
//!
//! # Example
//!
//! ```
//! use lspwire_protocol::dispatch::{Dispatcher, Incoming};
//! use lspwire_protocol::methods::RequestParams;
//!
//! let dispatcher = Dispatcher::default();
//! let incoming = dispatcher
//!     .decode(br#"{"jsonrpc":"2.0","id":1,"method":"shutdown"}"#)
//!     .unwrap();
//! assert!(matches!(
//!     incoming,
//!     Incoming::Request { params: RequestParams::Shutdown(()), .. }
//! ));
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod correlation;
pub mod dispatch;
mod error;
pub mod jsonrpc;
pub mod methods;
pub mod registry;
pub mod strict;
pub mod union;

pub use correlation::{Completion, CorrelationError, PendingRequests, RequestState};
pub use dispatch::{Dispatcher, Incoming, IncomingError};
pub use error::{Attempt, DecodeError, OutcomeProblem};
pub use jsonrpc::{
    JSONRPC_VERSION, Message, MessageShape, Notification, Outcome, Request, RequestId, Response,
    ResponseError,
};
pub use methods::{LspNotification, LspRequest, NotificationParams, RequestParams, ResponseResult};
pub use registry::{Direction, MethodEntry, MethodKind, MethodRegistry};
pub use strict::StrictDecode;
pub use union::{
    NullableOneOf2, NullableOneOf3, NullableOneOf4, NullableOneOf5, OneOf2, OneOf3, OneOf4,
    OneOf5, Tuple,
};
