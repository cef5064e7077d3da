//! `Registration`: one type-erased (message, result, handler) binding.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;
use crate::handler::{CommandHandler, HandlerProvider, QueryHandler};
use crate::message::{MessageKind, MessageType, ResultType};

pub(crate) type BoxedValue = Box<dyn Any + Send>;

/// Uniform calling convention shared by every binding: message in, result
/// out, both boxed as `dyn Any`. Built once per registration with the
/// concrete types captured.
type Invoker = Arc<
    dyn Fn(BoxedValue, CancellationToken) -> BoxFuture<'static, Result<BoxedValue, DispatchError>>
        + Send
        + Sync,
>;

/// A handler bound to the message and result types it declares.
///
/// This is the unit of the registration feed: build them from handlers (or
/// handler factories) and hand them to `HandlerRegistry::register`,
/// `HandlerRegistry::extend`, or `CqrsBuilder::register`.
///
/// ## Example
///
/// ```ignore
/// let bindings = vec![
///     Registration::command(CreateUserHandler::new(users.clone())),
///     Registration::query_factory(move || GetUserByIdHandler::new(users.clone())),
/// ];
/// registry.extend(bindings)?;
/// ```
#[derive(Clone)]
pub struct Registration {
    kind: MessageKind,
    message: MessageType,
    result: ResultType,
    invoker: Invoker,
}

impl Registration {
    /// Bind a single shared command handler instance.
    pub fn command<H: CommandHandler>(handler: H) -> Self {
        Self::command_provider(HandlerProvider::shared(handler))
    }

    /// Bind a command handler factory, called once per dispatch.
    pub fn command_factory<H, F>(factory: F) -> Self
    where
        H: CommandHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        Self::command_provider(HandlerProvider::factory(factory))
    }

    pub fn command_provider<H: CommandHandler>(provider: HandlerProvider<H>) -> Self {
        let invoker: Invoker = Arc::new(
            move |message: BoxedValue,
                  cancel: CancellationToken|
                  -> BoxFuture<'static, Result<BoxedValue, DispatchError>> {
                let handler = provider.get();
                Box::pin(async move {
                    let command = unbox::<H::Command, H::Output>(MessageKind::Command, message)?;
                    let output = handler.handle(command, cancel).await?;
                    Ok(Box::new(output) as BoxedValue)
                })
            },
        );

        Self {
            kind: MessageKind::Command,
            message: MessageType::of::<H::Command>(),
            result: ResultType::of::<H::Output>(),
            invoker,
        }
    }

    /// Bind a single shared query handler instance.
    pub fn query<H: QueryHandler>(handler: H) -> Self {
        Self::query_provider(HandlerProvider::shared(handler))
    }

    /// Bind a query handler factory, called once per dispatch.
    pub fn query_factory<H, F>(factory: F) -> Self
    where
        H: QueryHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        Self::query_provider(HandlerProvider::factory(factory))
    }

    pub fn query_provider<H: QueryHandler>(provider: HandlerProvider<H>) -> Self {
        let invoker: Invoker = Arc::new(
            move |message: BoxedValue,
                  cancel: CancellationToken|
                  -> BoxFuture<'static, Result<BoxedValue, DispatchError>> {
                let handler = provider.get();
                Box::pin(async move {
                    let query = unbox::<H::Query, H::Output>(MessageKind::Query, message)?;
                    let output = handler.handle(query, cancel).await?;
                    Ok(Box::new(output) as BoxedValue)
                })
            },
        );

        Self {
            kind: MessageKind::Query,
            message: MessageType::of::<H::Query>(),
            result: ResultType::of::<H::Output>(),
            invoker,
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn message_type(&self) -> MessageType {
        self.message
    }

    pub fn result_type(&self) -> ResultType {
        self.result
    }

    /// Run the bound handler. The message must be of this binding's message
    /// type; the registry key guarantees that for resolved bindings.
    pub(crate) fn invoke(
        &self,
        message: BoxedValue,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<BoxedValue, DispatchError>> {
        (self.invoker)(message, cancel)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("result", &self.result)
            .finish()
    }
}

/// Recover the concrete message from the uniform calling convention.
fn unbox<M: 'static, R: 'static>(kind: MessageKind, message: BoxedValue) -> Result<M, DispatchError> {
    message
        .downcast::<M>()
        .map(|message| *message)
        .map_err(|rejected| DispatchError::HandlerNotFound {
            kind,
            message: MessageType::of_erased(&*rejected).name(),
            result: ResultType::of::<R>().name(),
        })
}
