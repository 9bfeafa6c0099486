//! Outgoing request tracking.
//!
//! A [`Response`] carries no method name, so its result can only be typed by
//! remembering which method the matching request called. [`PendingRequests`]
//! keeps that mapping from request id to [`MethodKind`] until the response
//! arrives.

use crate::catalog::CancelParams;
use crate::error::DecodeError;
use crate::jsonrpc::{Notification, Outcome, Request, RequestId, Response, ResponseError};
use crate::methods::{LspRequest, ResponseResult, notifications};
use crate::registry::MethodKind;
use crate::union::OneOf2;
use lspwire_core::DispatchConfig;
use lspwire_core::logging::targets;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

/// Where an outgoing request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Sent and awaiting a response.
    Sent,
    /// A `$/cancelRequest` was sent; the response is still expected.
    Cancelled,
}

/// How a pending request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The peer answered with a result of the expected type.
    Fulfilled {
        /// The request's id.
        id: RequestId,
        /// The typed result.
        result: ResponseResult,
    },
    /// The peer answered with an error.
    Failed {
        /// The request's id.
        id: RequestId,
        /// The error object.
        error: ResponseError,
    },
    /// The request was cancelled locally; whatever the peer sent is discarded.
    Cancelled {
        /// The request's id.
        id: RequestId,
    },
}

/// Error tracking outgoing requests.
#[derive(Debug)]
pub enum CorrelationError {
    /// No pending request has this id.
    UnknownId(RequestId),
    /// A request with this id is already pending.
    DuplicateId(RequestId),
    /// The pending-request limit is reached.
    CapacityExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// The method is not a request method.
    NotARequest(MethodKind),
    /// A response arrived with a `null` id.
    MissingId,
    /// The id cannot be expressed in `$/cancelRequest` params.
    UncancellableId(RequestId),
    /// The result did not decode as the request's result type.
    Decode {
        /// The request's id.
        id: RequestId,
        /// Underlying failure.
        source: DecodeError,
    },
    /// The pending table's lock was poisoned.
    LockPoisoned(String),
}

impl fmt::Display for CorrelationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationError::UnknownId(id) => write!(f, "no pending request with id {id}"),
            CorrelationError::DuplicateId(id) => write!(f, "request id {id} is already pending"),
            CorrelationError::CapacityExceeded { limit } => {
                write!(f, "too many pending requests (limit {limit})")
            }
            CorrelationError::NotARequest(kind) => write!(f, "{kind} is not a request method"),
            CorrelationError::MissingId => write!(f, "response has a null id"),
            CorrelationError::UncancellableId(id) => {
                write!(f, "request id {id} does not fit in cancel params")
            }
            CorrelationError::Decode { id, source } => {
                write!(f, "bad result for request {id}: {source}")
            }
            CorrelationError::LockPoisoned(msg) => write!(f, "lock poisoned: {msg}"),
        }
    }
}

impl std::error::Error for CorrelationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CorrelationError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingEntry {
    kind: MethodKind,
    state: RequestState,
}

/// Requests sent to the peer that have not been answered yet.
#[derive(Debug)]
pub struct PendingRequests {
    entries: Mutex<HashMap<RequestId, PendingEntry>>,
    next_id: AtomicI64,
    limit: usize,
}

impl Default for PendingRequests {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PendingRequests {
    /// Creates a table holding at most `limit` requests (0 = unbounded).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            limit,
        }
    }

    /// Creates a table sized from the dispatch configuration.
    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(config.max_pending_requests)
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<RequestId, PendingEntry>>, CorrelationError>
    {
        self.entries
            .lock()
            .map_err(|e| CorrelationError::LockPoisoned(e.to_string()))
    }

    /// Allocates the next numeric request id.
    pub fn next_id(&self) -> RequestId {
        RequestId::Number(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Builds a request for `M` with a fresh id and starts tracking it.
    pub fn issue<M: LspRequest>(
        &self,
        params: M::Params,
    ) -> Result<Request<M::Params>, CorrelationError> {
        let id = self.next_id();
        self.register(id.clone(), M::KIND)?;
        Ok(Request::typed::<M>(id, params))
    }

    /// Starts tracking a request sent with a caller-chosen id.
    pub fn register(&self, id: RequestId, kind: MethodKind) -> Result<(), CorrelationError> {
        if !kind.is_request() {
            return Err(CorrelationError::NotARequest(kind));
        }
        let mut entries = self.lock()?;
        if self.limit > 0 && entries.len() >= self.limit {
            return Err(CorrelationError::CapacityExceeded { limit: self.limit });
        }
        if entries.contains_key(&id) {
            return Err(CorrelationError::DuplicateId(id));
        }
        lspwire_core::log_correlation!("pending {id} -> {kind}");
        entries.insert(
            id,
            PendingEntry {
                kind,
                state: RequestState::Sent,
            },
        );
        Ok(())
    }

    /// Marks a request cancelled and returns the `$/cancelRequest` to send.
    ///
    /// The entry stays until its response arrives, which then completes as
    /// [`Completion::Cancelled`].
    pub fn cancel(&self, id: &RequestId) -> Result<Notification<CancelParams>, CorrelationError> {
        let cancel_id = match id {
            RequestId::Number(n) => i32::try_from(*n)
                .map(OneOf2::A)
                .map_err(|_| CorrelationError::UncancellableId(id.clone()))?,
            RequestId::String(s) => OneOf2::B(s.clone()),
        };
        let mut entries = self.lock()?;
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| CorrelationError::UnknownId(id.clone()))?;
        entry.state = RequestState::Cancelled;
        lspwire_core::log_correlation!("cancelled {id} ({})", entry.kind);
        Ok(Notification::typed::<notifications::Cancel>(CancelParams {
            id: cancel_id,
        }))
    }

    /// Matches a response to its pending request and types the result.
    pub fn complete(&self, response: Response) -> Result<Completion, CorrelationError> {
        let id = response.id.ok_or(CorrelationError::MissingId)?;
        let entry = self.lock()?.remove(&id);
        let Some(entry) = entry else {
            log::warn!(target: targets::CORRELATION, "response for unknown request {id}");
            return Err(CorrelationError::UnknownId(id));
        };

        if entry.state == RequestState::Cancelled {
            lspwire_core::log_correlation!("discarding response for cancelled {id}");
            return Ok(Completion::Cancelled { id });
        }

        match response.outcome {
            Outcome::Error(error) => {
                lspwire_core::log_correlation!("{id} ({}) failed: {error}", entry.kind);
                Ok(Completion::Failed { id, error })
            }
            Outcome::Result(value) => match ResponseResult::decode_kind(entry.kind, &value) {
                Ok(result) => {
                    lspwire_core::log_correlation!("{id} ({}) fulfilled", entry.kind);
                    Ok(Completion::Fulfilled { id, result })
                }
                Err(source) => Err(CorrelationError::Decode { id, source }),
            },
        }
    }

    /// The state of a pending request.
    pub fn state(&self, id: &RequestId) -> Option<RequestState> {
        self.lock().ok()?.get(id).map(|entry| entry.state)
    }

    /// The method a pending request called.
    pub fn kind(&self, id: &RequestId) -> Option<MethodKind> {
        self.lock().ok()?.get(id).map(|entry| entry.kind)
    }

    /// Pending requests and their methods, in no particular order.
    pub fn outstanding(&self) -> Vec<(RequestId, MethodKind)> {
        self.lock()
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, entry)| (id.clone(), entry.kind))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
