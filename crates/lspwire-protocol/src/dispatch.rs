//! Incoming message dispatch.
//!
//! [`Dispatcher`] takes one raw message, classifies it, and decodes its
//! payload into the concrete type registered for its method. Failures carry
//! enough context for the caller to decide whether, and how, to reply.

use crate::error::DecodeError;
use crate::jsonrpc::{Message, MessageShape, Request, RequestId, Response, ResponseError, classify};
use crate::methods::{NotificationParams, RequestParams};
use crate::registry::MethodKind;
use crate::strict::StrictDecode;
use lspwire_core::logging::targets;
use lspwire_core::{DispatchConfig, ErrorCode, LspError, UnknownNotificationPolicy};
use serde_json::Value;
use std::fmt;

/// A decoded incoming message.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// A request with typed params.
    Request {
        /// ID to answer with.
        id: RequestId,
        /// Typed params; [`RequestParams::kind`] names the method.
        params: RequestParams,
    },
    /// A notification with typed params.
    Notification {
        /// Typed params; [`NotificationParams::kind`] names the method.
        params: NotificationParams,
    },
    /// A response. Its result is typed once it is matched to a pending request.
    Response(Response),
    /// A notification with an unregistered method, dropped by policy.
    Ignored {
        /// The unregistered method name.
        method: String,
    },
}

impl Incoming {
    /// The method kind, for requests and notifications.
    pub fn kind(&self) -> Option<MethodKind> {
        match self {
            Incoming::Request { params, .. } => Some(params.kind()),
            Incoming::Notification { params } => Some(params.kind()),
            Incoming::Ignored { .. } => Some(MethodKind::Unknown),
            Incoming::Response(_) => None,
        }
    }
}

/// A message that could not be dispatched.
#[derive(Debug)]
pub struct IncomingError {
    /// What went wrong.
    pub error: DecodeError,
    /// Envelope shape by key presence, if the input was an object that had one.
    pub shape: Option<MessageShape>,
    /// The request ID, when the failed message was a request with a readable id.
    pub reply_to: Option<RequestId>,
}

impl IncomingError {
    /// The JSON-RPC error code for this failure.
    pub fn code(&self) -> ErrorCode {
        self.error.error_code()
    }

    /// The error response to send back, if any.
    ///
    /// Notifications and responses are never answered. Input that is not a
    /// message at all gets a reply with a `null` id.
    pub fn to_response(&self) -> Option<Response> {
        match self.shape {
            Some(MessageShape::Notification | MessageShape::Response) => None,
            Some(MessageShape::Request) | None => {
                Some(Response::error(self.reply_to.clone(), self.response_error()))
            }
        }
    }

    fn response_error(&self) -> ResponseError {
        match self.error.root_cause() {
            DecodeError::UnknownMethod(method) => LspError::method_not_found(method).into(),
            _ => ResponseError::new(self.code(), self.error.to_string()),
        }
    }

    fn new(error: DecodeError, shape: Option<MessageShape>, reply_to: Option<RequestId>) -> Self {
        Self {
            error,
            shape,
            reply_to,
        }
    }
}

impl fmt::Display for IncomingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Some(shape) => write!(f, "invalid {shape}: {}", self.error),
            None => write!(f, "invalid message: {}", self.error),
        }
    }
}

impl std::error::Error for IncomingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Decodes incoming messages into typed payloads.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    /// Creates a dispatcher.
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Parses and dispatches one message.
    pub fn decode(&self, bytes: &[u8]) -> Result<Incoming, IncomingError> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            lspwire_core::log_envelope!("unparseable message: {e}");
            IncomingError::new(DecodeError::Json(e), None, None)
        })?;
        self.decode_value(&value)
    }

    /// Dispatches one already-parsed message.
    pub fn decode_value(&self, value: &Value) -> Result<Incoming, IncomingError> {
        let message = Message::decode_strict(value).map_err(|error| {
            let (shape, reply_to) = salvage(value);
            lspwire_core::log_envelope!("rejected message: {error}");
            IncomingError::new(error, shape, reply_to)
        })?;

        match message {
            Message::Request(request) => Self::dispatch_request(request),
            Message::Notification(notification) => {
                match NotificationParams::decode(&notification.method, &notification.params) {
                    Ok(params) => {
                        lspwire_core::log_dispatch!("notification {}", notification.method);
                        Ok(Incoming::Notification { params })
                    }
                    Err(DecodeError::UnknownMethod(method))
                        if self.config.unknown_notifications == UnknownNotificationPolicy::Ignore =>
                    {
                        log::warn!(target: targets::DISPATCH, "ignoring unknown notification `{method}`");
                        Ok(Incoming::Ignored { method })
                    }
                    Err(error) => {
                        lspwire_core::log_dispatch!("bad notification {}: {error}", notification.method);
                        Err(IncomingError::new(error, Some(MessageShape::Notification), None))
                    }
                }
            }
            Message::Response(response) => {
                lspwire_core::log_dispatch!(
                    "response for {}",
                    response.id.as_ref().map_or_else(|| "null".to_string(), ToString::to_string)
                );
                Ok(Incoming::Response(response))
            }
        }
    }

    fn dispatch_request(request: Request) -> Result<Incoming, IncomingError> {
        match RequestParams::decode(&request.method, &request.params) {
            Ok(params) => {
                lspwire_core::log_dispatch!("request {} ({})", request.method, request.id);
                Ok(Incoming::Request {
                    id: request.id,
                    params,
                })
            }
            Err(error) => {
                lspwire_core::log_dispatch!("bad request {} ({}): {error}", request.method, request.id);
                Err(IncomingError::new(
                    error,
                    Some(MessageShape::Request),
                    Some(request.id),
                ))
            }
        }
    }
}

/// Recovers the shape and request id of a message that failed to decode.
fn salvage(value: &Value) -> (Option<MessageShape>, Option<RequestId>) {
    let Some(object) = value.as_object() else {
        return (None, None);
    };
    let Ok(shape) = classify(object) else {
        return (None, None);
    };
    let reply_to = match shape {
        MessageShape::Request => object
            .get("id")
            .and_then(|id| RequestId::decode_strict(id).ok()),
        _ => None,
    };
    (Some(shape), reply_to)
}
