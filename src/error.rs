use std::error::Error;
use std::fmt;

use crate::message::MessageKind;

/// Error type for handler implementations.
#[derive(Debug)]
pub enum HandlerError {
    /// Business logic rejected the message (invariant violation, conflict).
    Rejected(String),
    /// The resource the message refers to does not exist.
    NotFound(String),
    /// Missing or invalid authentication / authorization.
    Unauthorized(String),
    /// The handler observed its cancellation token and stopped.
    Cancelled,
    /// Other error.
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Rejected(msg) => write!(f, "rejected: {}", msg),
            HandlerError::NotFound(id) => write!(f, "not found: {}", id),
            HandlerError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            HandlerError::Cancelled => write!(f, "cancelled"),
            HandlerError::Other(e) => write!(f, "handler error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Error type for registration and dispatch.
///
/// Routing failures are reported by the core; anything a handler returns is
/// carried in `Handler` exactly as the handler produced it.
#[derive(Debug)]
pub enum DispatchError {
    /// No binding exists for the requested (message, result) key.
    HandlerNotFound {
        kind: MessageKind,
        message: &'static str,
        result: &'static str,
    },
    /// The message type is bound, but to a different result type than the
    /// caller asked for.
    ResultTypeMismatch {
        kind: MessageKind,
        message: &'static str,
        requested: &'static str,
        registered: &'static str,
    },
    /// A binding for this key already exists and the registry rejects
    /// duplicates.
    DuplicateRegistration {
        kind: MessageKind,
        message: &'static str,
        result: &'static str,
    },
    /// A query handler was registered with a unit result. Every query
    /// produces a value; fire-and-forget belongs to commands.
    QueryWithoutResult { message: &'static str },
    /// The handler's own failure, passed through untouched.
    Handler(HandlerError),
}

impl DispatchError {
    /// The handler's error, if this failure came from the handler.
    pub fn handler_error(&self) -> Option<&HandlerError> {
        match self {
            DispatchError::Handler(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_handler_error(self) -> Option<HandlerError> {
        match self {
            DispatchError::Handler(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::HandlerNotFound {
                kind,
                message,
                result,
            } => write!(
                f,
                "no {} handler registered for {} (result {})",
                kind, message, result
            ),
            DispatchError::ResultTypeMismatch {
                kind,
                message,
                requested,
                registered,
            } => write!(
                f,
                "{} handler for {} returns {}, but {} was requested",
                kind, message, registered, requested
            ),
            DispatchError::DuplicateRegistration {
                kind,
                message,
                result,
            } => write!(
                f,
                "{} handler already registered for {} (result {})",
                kind, message, result
            ),
            DispatchError::QueryWithoutResult { message } => write!(
                f,
                "query {} declares no result; use a command for fire-and-forget",
                message
            ),
            DispatchError::Handler(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::Handler(e) => e.source(),
            _ => None,
        }
    }
}

impl From<HandlerError> for DispatchError {
    fn from(err: HandlerError) -> Self {
        DispatchError::Handler(err)
    }
}
