//! In-process CQRS dispatch core.
//!
//! Commands and queries are plain structs marked with `Command<R>` /
//! `Query<R>`. Handlers are registered once into a `HandlerRegistry`; the
//! `CommandDispatcher` and `QueryDispatcher` route each message to the one
//! handler bound to its exact type and return the handler's result.
//!
//! Messages can be dispatched with their concrete type known at the call
//! site, or held only as `Box<dyn AnyCommand<R>>` / `Box<dyn AnyQuery<R>>` /
//! `Box<dyn Any + Send>`; routing always uses the runtime type.

mod config;
mod cqrs;
mod dispatch;
mod error;
mod handler;
mod message;
mod registry;

pub use config::{DispatchConfig, DuplicatePolicy};
pub use cqrs::{Cqrs, CqrsBuilder};
pub use dispatch::{CommandDispatcher, QueryDispatcher};
pub use error::{DispatchError, HandlerError};
pub use handler::{CommandHandler, HandlerProvider, QueryHandler};
pub use message::{AnyCommand, AnyQuery, Command, MessageKind, MessageType, Query, ResultType};
pub use registry::{HandlerRegistry, Registration, RegistryStore};

// Re-export the derive macros (same names as the traits they implement)
#[cfg(feature = "macros")]
pub use cqrs_dispatch_macros::{Command, Query};

// Re-export what handler implementations need in their signatures
pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;
