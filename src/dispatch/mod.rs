//! Command and query dispatchers.
//!
//! Both dispatchers are stateless views over a shared `RegistryStore`. Every
//! call shape (static, trait object, fully untyped) ends in `route`, which
//! resolves the binding, runs its erased invoker, and re-types the output.

mod command;
mod query;

pub use command::CommandDispatcher;
pub use query::QueryDispatcher;

use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;
use crate::message::{MessageKind, MessageType, ResultType};
use crate::registry::{BoxedValue, RegistryStore};

/// Resolve `(kind, message, R)` and run the bound handler.
///
/// The registry lookup finishes before the handler is awaited; no registry
/// state is held across the await.
async fn route<R: Send + 'static>(
    registry: &RegistryStore,
    kind: MessageKind,
    message: MessageType,
    value: BoxedValue,
    cancel: CancellationToken,
) -> Result<R, DispatchError> {
    let requested = ResultType::of::<R>();
    let binding = registry.resolve(kind, message, requested)?;

    let output = binding.invoke(value, cancel).await?;

    // The key already pins the result type; this is the single point where
    // the erased output is re-typed.
    output
        .downcast::<R>()
        .map(|output| *output)
        .map_err(|_| DispatchError::ResultTypeMismatch {
            kind,
            message: binding.message_type().name(),
            requested: requested.name(),
            registered: binding.result_type().name(),
        })
}
