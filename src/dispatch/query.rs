use std::any::Any;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::route;
use crate::error::DispatchError;
use crate::message::{AnyQuery, MessageKind, MessageType, Query};
use crate::registry::RegistryStore;

/// Routes queries to their registered handler. Every query returns a result.
///
/// ## Example
///
/// ```ignore
/// let user: UserDto = queries.send(GetUserById { id: 42 }).await?;
///
/// let query: Box<dyn AnyQuery<UserDto>> = Box::new(GetUserById { id: 42 });
/// let same: UserDto = queries.send_dyn(query).await?;
/// ```
#[derive(Clone)]
pub struct QueryDispatcher {
    registry: Arc<RegistryStore>,
}

impl QueryDispatcher {
    pub fn new(registry: Arc<RegistryStore>) -> Self {
        Self { registry }
    }

    pub async fn send<Q, R>(&self, query: Q) -> Result<R, DispatchError>
    where
        Q: Query<R>,
        R: Send + 'static,
    {
        self.send_with_cancel(query, CancellationToken::new()).await
    }

    pub async fn send_with_cancel<Q, R>(
        &self,
        query: Q,
        cancel: CancellationToken,
    ) -> Result<R, DispatchError>
    where
        Q: Query<R>,
        R: Send + 'static,
    {
        route(
            &self.registry,
            MessageKind::Query,
            MessageType::of::<Q>(),
            Box::new(query),
            cancel,
        )
        .await
    }

    /// Dispatch a query held only through its base capability.
    pub async fn send_dyn<R>(&self, query: Box<dyn AnyQuery<R>>) -> Result<R, DispatchError>
    where
        R: Send + 'static,
    {
        self.send_dyn_with_cancel(query, CancellationToken::new())
            .await
    }

    pub async fn send_dyn_with_cancel<R>(
        &self,
        query: Box<dyn AnyQuery<R>>,
        cancel: CancellationToken,
    ) -> Result<R, DispatchError>
    where
        R: Send + 'static,
    {
        let message = query.message_type();
        route(
            &self.registry,
            MessageKind::Query,
            message,
            query.into_any(),
            cancel,
        )
        .await
    }

    /// Dispatch a fully untyped query.
    pub async fn send_any<R>(&self, query: Box<dyn Any + Send>) -> Result<R, DispatchError>
    where
        R: Send + 'static,
    {
        self.send_any_with_cancel(query, CancellationToken::new())
            .await
    }

    pub async fn send_any_with_cancel<R>(
        &self,
        query: Box<dyn Any + Send>,
        cancel: CancellationToken,
    ) -> Result<R, DispatchError>
    where
        R: Send + 'static,
    {
        let message = MessageType::of_erased(&*query);
        route(&self.registry, MessageKind::Query, message, query, cancel).await
    }

    pub fn registry(&self) -> &Arc<RegistryStore> {
        &self.registry
    }
}
