use std::any::Any;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::route;
use crate::error::DispatchError;
use crate::message::{AnyCommand, Command, MessageKind, MessageType};
use crate::registry::RegistryStore;

/// Routes commands to their registered handler.
///
/// Four call shapes, each with a `_with_cancel` form that forwards the
/// caller's token to the handler unchanged:
///
/// - `send`: statically typed, no result
/// - `send_returning`: statically typed, result `R`
/// - `send_dyn`: held as `Box<dyn AnyCommand<R>>`, routed by runtime type
/// - `send_any`: held as `Box<dyn Any + Send>`, routed by runtime type
///
/// ## Example
///
/// ```ignore
/// commands.send(CreateUser { name: "Alice".into() }).await?;
/// let id: UserId = commands.send_returning(RegisterUser { name: "Bob".into() }).await?;
///
/// let forwarded: Box<dyn AnyCommand<UserId>> = Box::new(RegisterUser { name: "Eve".into() });
/// let id = commands.send_dyn(forwarded).await?;
/// ```
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<RegistryStore>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<RegistryStore>) -> Self {
        Self { registry }
    }

    /// Dispatch a command that produces no result.
    pub async fn send<C: Command>(&self, command: C) -> Result<(), DispatchError> {
        self.send_with_cancel(command, CancellationToken::new()).await
    }

    pub async fn send_with_cancel<C: Command>(
        &self,
        command: C,
        cancel: CancellationToken,
    ) -> Result<(), DispatchError> {
        self.send_returning_with_cancel::<C, ()>(command, cancel)
            .await
    }

    /// Dispatch a command and return the handler's result.
    pub async fn send_returning<C, R>(&self, command: C) -> Result<R, DispatchError>
    where
        C: Command<R>,
        R: Send + 'static,
    {
        self.send_returning_with_cancel(command, CancellationToken::new())
            .await
    }

    pub async fn send_returning_with_cancel<C, R>(
        &self,
        command: C,
        cancel: CancellationToken,
    ) -> Result<R, DispatchError>
    where
        C: Command<R>,
        R: Send + 'static,
    {
        route(
            &self.registry,
            MessageKind::Command,
            MessageType::of::<C>(),
            Box::new(command),
            cancel,
        )
        .await
    }

    /// Dispatch a command held only through its base capability. Routing
    /// uses the command's concrete runtime type paired with `R`.
    pub async fn send_dyn<R>(&self, command: Box<dyn AnyCommand<R>>) -> Result<R, DispatchError>
    where
        R: Send + 'static,
    {
        self.send_dyn_with_cancel(command, CancellationToken::new())
            .await
    }

    pub async fn send_dyn_with_cancel<R>(
        &self,
        command: Box<dyn AnyCommand<R>>,
        cancel: CancellationToken,
    ) -> Result<R, DispatchError>
    where
        R: Send + 'static,
    {
        let message = command.message_type();
        route(
            &self.registry,
            MessageKind::Command,
            message,
            command.into_any(),
            cancel,
        )
        .await
    }

    /// Dispatch a fully untyped command, e.g. one forwarded from a decoder.
    ///
    /// Fails with `ResultTypeMismatch` if the command's handler does not
    /// produce `R`.
    pub async fn send_any<R>(&self, command: Box<dyn Any + Send>) -> Result<R, DispatchError>
    where
        R: Send + 'static,
    {
        self.send_any_with_cancel(command, CancellationToken::new())
            .await
    }

    pub async fn send_any_with_cancel<R>(
        &self,
        command: Box<dyn Any + Send>,
        cancel: CancellationToken,
    ) -> Result<R, DispatchError>
    where
        R: Send + 'static,
    {
        let message = MessageType::of_erased(&*command);
        route(&self.registry, MessageKind::Command, message, command, cancel).await
    }

    pub fn registry(&self) -> &Arc<RegistryStore> {
        &self.registry
    }
}
