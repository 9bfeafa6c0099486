//! JSON-RPC 2.0 message envelopes.
//!
//! Every message is one JSON object. Its kind is decided purely by which
//! keys are present ([`classify`]):
//!
//! | `method` | `id` | kind |
//! |---|---|---|
//! | yes | yes | [`Request`] |
//! | yes | no | [`Notification`] |
//! | no | yes | [`Response`] |
//! | no | no | invalid |
//!
//! Decoding a [`Message`] additionally cross-checks the method's registered
//! direction, so a request method sent without an `id` is rejected instead
//! of being treated as a notification.

use crate::error::{DecodeError, OutcomeProblem};
use crate::registry::{Direction, MethodKind};
use crate::strict::{FieldSet, ObjectView, StrictDecode, deserialize_strict, strict_struct};
use lspwire_core::logging::targets;
use lspwire_core::{ErrorCode, LspError};
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// The only protocol version accepted on the wire.
pub const JSONRPC_VERSION: &str = "2.0";

const REQUEST_FIELDS: FieldSet = FieldSet::new("Request", &["jsonrpc", "id", "method"], &["params"]);
const NOTIFICATION_FIELDS: FieldSet =
    FieldSet::new("Notification", &["jsonrpc", "method"], &["params"]);
const RESPONSE_FIELDS: FieldSet = FieldSet::new("Response", &["jsonrpc", "id"], &["result", "error"]);

/// JSON-RPC request ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Integer ID.
    Number(i64),
    /// String ID.
    String(String),
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Number(id)
    }
}

impl From<i32> for RequestId {
    fn from(id: i32) -> Self {
        RequestId::Number(i64::from(id))
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId::String(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::String(id.to_owned())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => write!(f, "{s}"),
        }
    }
}

impl StrictDecode for RequestId {
    fn shape_name() -> String {
        "integer | string".to_string()
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(s) => Ok(RequestId::String(s.clone())),
            Value::Number(n) => n
                .as_i64()
                .map(RequestId::Number)
                .ok_or_else(|| DecodeError::type_mismatch(Self::shape_name(), value)),
            other => Err(DecodeError::type_mismatch(Self::shape_name(), other)),
        }
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_strict(deserializer)
    }
}

fn check_version(object: &ObjectView<'_>) -> Result<String, DecodeError> {
    match object.raw("jsonrpc") {
        Some(Value::String(version)) if version == JSONRPC_VERSION => Ok(version.clone()),
        Some(other) => Err(DecodeError::InvalidVersion(other.to_string())),
        None => Err(DecodeError::InvalidVersion("nothing".to_string())),
    }
}

fn decode_params<P: StrictDecode>(
    object: &ObjectView<'_>,
    shape: &str,
    field: &str,
) -> Result<P, DecodeError> {
    P::decode_strict(object.raw(field).unwrap_or(&Value::Null)).map_err(|e| e.in_field(shape, field))
}

// ============================================================================
// Request
// ============================================================================

/// A request: expects exactly one [`Response`] echoing its `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<P = Value> {
    /// Protocol version (always "2.0").
    pub jsonrpc: String,
    /// Request ID.
    pub id: RequestId,
    /// Method name.
    pub method: String,
    /// Request parameters. Absent params decode from `null`.
    pub params: P,
}

impl<P> Request<P> {
    /// Creates a new request.
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Resolves the method name against the registry.
    pub fn kind(&self) -> MethodKind {
        MethodKind::resolve(&self.method)
    }
}

impl Request<Value> {
    /// Decodes the raw params into a concrete payload type.
    pub fn into_typed<P: StrictDecode>(self) -> Result<Request<P>, DecodeError> {
        let params =
            P::decode_strict(&self.params).map_err(|e| e.in_field("Request", "params"))?;
        Ok(Request {
            jsonrpc: self.jsonrpc,
            id: self.id,
            method: self.method,
            params,
        })
    }
}

impl<P: StrictDecode> StrictDecode for Request<P> {
    fn shape_name() -> String {
        format!("Request<{}>", P::shape_name())
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        let object = REQUEST_FIELDS.check(value)?;
        Ok(Self {
            jsonrpc: check_version(&object)?,
            id: object.required("id")?,
            method: object.required("method")?,
            params: decode_params(&object, "Request", "params")?,
        })
    }
}

impl<P: Serialize> Serialize for Request<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let params = serde_json::to_value(&self.params).map_err(S::Error::custom)?;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("jsonrpc", &self.jsonrpc)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("method", &self.method)?;
        if !params.is_null() {
            map.serialize_entry("params", &params)?;
        }
        map.end()
    }
}

impl<'de, P: StrictDecode> Deserialize<'de> for Request<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_strict(deserializer)
    }
}

// ============================================================================
// Notification
// ============================================================================

/// A notification: no `id`, never answered.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification<P = Value> {
    /// Protocol version (always "2.0").
    pub jsonrpc: String,
    /// Method name.
    pub method: String,
    /// Notification parameters. Absent params decode from `null`.
    pub params: P,
}

impl<P> Notification<P> {
    /// Creates a new notification.
    pub fn new(method: impl Into<String>, params: P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            method: method.into(),
            params,
        }
    }

    /// Resolves the method name against the registry.
    pub fn kind(&self) -> MethodKind {
        MethodKind::resolve(&self.method)
    }
}

impl Notification<Value> {
    /// Decodes the raw params into a concrete payload type.
    pub fn into_typed<P: StrictDecode>(self) -> Result<Notification<P>, DecodeError> {
        let params =
            P::decode_strict(&self.params).map_err(|e| e.in_field("Notification", "params"))?;
        Ok(Notification {
            jsonrpc: self.jsonrpc,
            method: self.method,
            params,
        })
    }
}

impl<P: StrictDecode> StrictDecode for Notification<P> {
    fn shape_name() -> String {
        format!("Notification<{}>", P::shape_name())
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        let object = NOTIFICATION_FIELDS.check(value)?;
        Ok(Self {
            jsonrpc: check_version(&object)?,
            method: object.required("method")?,
            params: decode_params(&object, "Notification", "params")?,
        })
    }
}

impl<P: Serialize> Serialize for Notification<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let params = serde_json::to_value(&self.params).map_err(S::Error::custom)?;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("jsonrpc", &self.jsonrpc)?;
        map.serialize_entry("method", &self.method)?;
        if !params.is_null() {
            map.serialize_entry("params", &params)?;
        }
        map.end()
    }
}

impl<'de, P: StrictDecode> Deserialize<'de> for Notification<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_strict(deserializer)
    }
}

// ============================================================================
// Response
// ============================================================================

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseError {
    /// Error code.
    pub code: i32,
    /// Error message.
    pub message: String,
    /// Additional error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

strict_struct!(ResponseError {
    required { code: "code", message: "message" }
    optional { data: "data" }
});

impl ResponseError {
    /// Creates an error object.
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into().code(),
            message: message.into(),
            data: None,
        }
    }

    /// Builds an error object from any error value.
    pub fn from_error(code: impl Into<ErrorCode>, err: &dyn std::error::Error) -> Self {
        Self::new(code, err.to_string())
    }

    /// The error code, with unknown codes preserved as [`ErrorCode::Custom`].
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from(self.code)
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ResponseError {}

impl From<LspError> for ResponseError {
    fn from(err: LspError) -> Self {
        Self {
            code: err.code.into(),
            message: err.message,
            data: err.data,
        }
    }
}

impl From<ResponseError> for LspError {
    fn from(err: ResponseError) -> Self {
        LspError {
            code: ErrorCode::from(err.code),
            message: err.message,
            data: err.data,
        }
    }
}

/// The result or error carried by a [`Response`]. Exactly one exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<R> {
    /// The request succeeded.
    Result(R),
    /// The request failed.
    Error(ResponseError),
}

/// A response to a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub struct Response<R = Value> {
    /// Protocol version (always "2.0").
    pub jsonrpc: String,
    /// ID of the request this answers. Only an error response may carry `null`,
    /// when the request's id could not be read.
    pub id: Option<RequestId>,
    /// Result or error.
    pub outcome: Outcome<R>,
}

impl<R> Response<R> {
    /// Creates a success response.
    pub fn success(id: RequestId, result: R) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id: Some(id),
            outcome: Outcome::Result(result),
        }
    }

    /// Creates an error response.
    pub fn error(id: Option<RequestId>, error: impl Into<ResponseError>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id,
            outcome: Outcome::Error(error.into()),
        }
    }

    /// Returns true if this is an error response.
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<R, ResponseError> {
        match self.outcome {
            Outcome::Result(result) => Ok(result),
            Outcome::Error(error) => Err(error),
        }
    }
}

impl<R: StrictDecode> StrictDecode for Response<R> {
    fn shape_name() -> String {
        format!("Response<{}>", R::shape_name())
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        let object = RESPONSE_FIELDS.check(value)?;
        let jsonrpc = check_version(&object)?;
        let outcome = match (object.raw("result"), object.raw("error")) {
            (Some(_), Some(_)) => {
                return Err(DecodeError::InvalidResponseOutcome(
                    OutcomeProblem::Conflicting,
                ));
            }
            (None, None) => {
                return Err(DecodeError::InvalidResponseOutcome(OutcomeProblem::Missing));
            }
            (Some(_), None) => Outcome::Result(decode_params(&object, "Response", "result")?),
            (None, Some(_)) => Outcome::Error(object.required("error")?),
        };
        let id: Option<RequestId> = object.required("id")?;
        if id.is_none() && matches!(outcome, Outcome::Result(_)) {
            return Err(DecodeError::InvalidMessageShape(
                "successful response with a null id".to_string(),
            ));
        }
        Ok(Self {
            jsonrpc,
            id,
            outcome,
        })
    }
}

impl<R: Serialize> Serialize for Response<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("jsonrpc", &self.jsonrpc)?;
        map.serialize_entry("id", &self.id)?;
        match &self.outcome {
            Outcome::Result(result) => map.serialize_entry("result", result)?,
            Outcome::Error(error) => map.serialize_entry("error", error)?,
        }
        map.end()
    }
}

impl<'de, R: StrictDecode> Deserialize<'de> for Response<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_strict(deserializer)
    }
}

// ============================================================================
// Message
// ============================================================================

/// Which envelope a message object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageShape {
    /// `method` and `id`.
    Request,
    /// `method` without `id`.
    Notification,
    /// `id` without `method`.
    Response,
}

impl MessageShape {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageShape::Request => "request",
            MessageShape::Notification => "notification",
            MessageShape::Response => "response",
        }
    }
}

impl fmt::Display for MessageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a message object by key presence alone.
pub fn classify(object: &Map<String, Value>) -> Result<MessageShape, DecodeError> {
    match (object.contains_key("method"), object.contains_key("id")) {
        (true, true) => Ok(MessageShape::Request),
        (true, false) => Ok(MessageShape::Notification),
        (false, true) => Ok(MessageShape::Response),
        (false, false) => Err(DecodeError::InvalidMessageShape(
            "object has neither `method` nor `id`".to_string(),
        )),
    }
}

/// Any message, with untyped params and result.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A request.
    Request(Request),
    /// A notification.
    Notification(Notification),
    /// A response.
    Response(Response),
}

impl Message {
    /// Parses and decodes a message from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        crate::strict::from_slice(bytes)
    }

    /// Parses and decodes a message from a string.
    pub fn from_str(text: &str) -> Result<Self, DecodeError> {
        crate::strict::from_str(text)
    }

    /// The envelope shape.
    pub fn shape(&self) -> MessageShape {
        match self {
            Message::Request(_) => MessageShape::Request,
            Message::Notification(_) => MessageShape::Notification,
            Message::Response(_) => MessageShape::Response,
        }
    }

    /// The method name, for requests and notifications.
    pub fn method(&self) -> Option<&str> {
        match self {
            Message::Request(r) => Some(&r.method),
            Message::Notification(n) => Some(&n.method),
            Message::Response(_) => None,
        }
    }

    /// The request ID, for requests and responses.
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            Message::Request(r) => Some(&r.id),
            Message::Notification(_) => None,
            Message::Response(r) => r.id.as_ref(),
        }
    }
}

fn check_direction(object: &Map<String, Value>, shape: MessageShape) -> Result<(), DecodeError> {
    let Some(method) = object.get("method").and_then(Value::as_str) else {
        return Ok(());
    };
    let direction = MethodKind::resolve(method).direction();
    match (shape, direction) {
        (MessageShape::Notification, Some(Direction::Request)) => Err(
            DecodeError::InvalidMessageShape(format!("request `{method}` is missing its `id`")),
        ),
        (MessageShape::Request, Some(Direction::Notification)) => Err(
            DecodeError::InvalidMessageShape(format!("notification `{method}` carries an `id`")),
        ),
        _ => Ok(()),
    }
}

impl StrictDecode for Message {
    fn shape_name() -> String {
        "Message".to_string()
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        let object = value.as_object().ok_or_else(|| {
            DecodeError::InvalidMessageShape(format!(
                "expected an object, found {}",
                crate::error::json_type_name(value)
            ))
        })?;
        let shape = classify(object)?;
        check_direction(object, shape)?;
        log::trace!(target: targets::ENVELOPE, "classified message as {shape}");
        let message = match shape {
            MessageShape::Request => Message::Request(Request::decode_strict(value)?),
            MessageShape::Notification => {
                Message::Notification(Notification::decode_strict(value)?)
            }
            MessageShape::Response => Message::Response(Response::decode_strict(value)?),
        };
        Ok(message)
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Message::Request(r) => r.serialize(serializer),
            Message::Notification(n) => n.serialize(serializer),
            Message::Response(r) => r.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_strict(deserializer)
    }
}

impl From<Request> for Message {
    fn from(request: Request) -> Self {
        Message::Request(request)
    }
}

impl From<Notification> for Message {
    fn from(notification: Notification) -> Self {
        Message::Notification(notification)
    }
}

impl From<Response> for Message {
    fn from(response: Response) -> Self {
        Message::Response(response)
    }
}
