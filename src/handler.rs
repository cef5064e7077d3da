//! Handler capabilities and how the registry obtains handler instances.
//!
//! A handler declares the one message type it processes and the result it
//! produces as associated types, so registering it needs no turbofish:
//!
//! ```ignore
//! struct CreateUserHandler { users: Arc<UserStore> }
//!
//! #[async_trait]
//! impl CommandHandler for CreateUserHandler {
//!     type Command = CreateUser;
//!     type Output = ();
//!
//!     async fn handle(&self, cmd: CreateUser, _cancel: CancellationToken) -> Result<(), HandlerError> {
//!         self.users.insert(cmd.name);
//!         Ok(())
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::message::{Command, Query};

/// Processes one command type. `Output = ()` for commands without a result.
#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    type Command: Command<Self::Output>;
    type Output: Send + 'static;

    /// The token is the one the caller passed to the dispatcher, unchanged.
    async fn handle(
        &self,
        command: Self::Command,
        cancel: CancellationToken,
    ) -> Result<Self::Output, HandlerError>;
}

/// Processes one query type.
#[async_trait]
pub trait QueryHandler: Send + Sync + 'static {
    type Query: Query<Self::Output>;
    type Output: Send + 'static;

    async fn handle(
        &self,
        query: Self::Query,
        cancel: CancellationToken,
    ) -> Result<Self::Output, HandlerError>;
}

/// Where a registered handler instance comes from on each dispatch.
///
/// `Shared` hands out the same instance every time. `Factory` builds a fresh
/// instance per dispatch, so the caller controls lifetime (per-request state,
/// pooled connections, ...).
pub enum HandlerProvider<H> {
    Shared(Arc<H>),
    Factory(Arc<dyn Fn() -> H + Send + Sync>),
}

impl<H> HandlerProvider<H> {
    pub fn shared(handler: H) -> Self {
        HandlerProvider::Shared(Arc::new(handler))
    }

    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> H + Send + Sync + 'static,
    {
        HandlerProvider::Factory(Arc::new(factory))
    }

    /// Get the handler instance for one dispatch.
    pub fn get(&self) -> Arc<H> {
        match self {
            HandlerProvider::Shared(handler) => Arc::clone(handler),
            HandlerProvider::Factory(factory) => Arc::new(factory()),
        }
    }
}

impl<H> Clone for HandlerProvider<H> {
    fn clone(&self) -> Self {
        match self {
            HandlerProvider::Shared(handler) => HandlerProvider::Shared(Arc::clone(handler)),
            HandlerProvider::Factory(factory) => HandlerProvider::Factory(Arc::clone(factory)),
        }
    }
}

impl<H> fmt::Debug for HandlerProvider<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerProvider::Shared(_) => f.write_str("HandlerProvider::Shared"),
            HandlerProvider::Factory(_) => f.write_str("HandlerProvider::Factory"),
        }
    }
}
