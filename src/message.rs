//! Message model: commands, queries, and their runtime type descriptors.
//!
//! Messages are plain Rust structs. Marking a struct as a command or query is
//! a one-line marker impl (or `#[derive(Command)]` / `#[derive(Query)]` with
//! the `macros` feature):
//!
//! ```ignore
//! struct CreateUser { name: String }
//! impl Command for CreateUser {}
//!
//! struct RegisterUser { name: String }
//! impl Command<UserId> for RegisterUser {}
//!
//! struct GetUserById { id: u64 }
//! impl Query<UserDto> for GetUserById {}
//! ```
//!
//! A message's routing identity is its exact concrete type. Call sites that
//! only hold a message through its base capability use `AnyCommand<R>` /
//! `AnyQuery<R>` trait objects, which still report the concrete type.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A request to change state, producing `R` (or nothing, for the default `()`).
///
/// A type may implement `Command<R>` for several `R`; each pair is a separate
/// routing key.
pub trait Command<R = ()>: Send + 'static {}

/// A request to read state. Every query produces a result; there is no
/// default result type.
pub trait Query<R>: Send + 'static {}

/// Whether a message is routed as a command or as a query.
///
/// Commands and queries live in separate key spaces, so the same struct may
/// be registered as both without colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Command,
    Query,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Command => write!(f, "command"),
            MessageKind::Query => write!(f, "query"),
        }
    }
}

const ERASED_NAME: &str = "<type-erased message>";

/// Runtime identity of a concrete message type.
///
/// Equality and hashing use only the `TypeId`; the name is for diagnostics.
#[derive(Clone, Copy)]
pub struct MessageType {
    id: TypeId,
    name: &'static str,
}

impl MessageType {
    /// Descriptor for a statically known message type.
    pub fn of<M: 'static>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: type_name::<M>(),
        }
    }

    /// Descriptor for a value only known as `dyn Any`. The `TypeId` is that of
    /// the concrete value; the name is not recoverable.
    pub fn of_erased(value: &(dyn Any + Send)) -> Self {
        let value: &dyn Any = value;
        Self {
            id: value.type_id(),
            name: ERASED_NAME,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_erased(&self) -> bool {
        self.name == ERASED_NAME
    }
}

impl PartialEq for MessageType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MessageType {}

impl Hash for MessageType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageType").field(&self.name).finish()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Runtime identity of a handler's result type. `()` means "no result".
#[derive(Clone, Copy)]
pub struct ResultType {
    id: TypeId,
    name: &'static str,
}

impl ResultType {
    pub fn of<R: 'static>() -> Self {
        Self {
            id: TypeId::of::<R>(),
            name: type_name::<R>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True for commands declared without a result.
    pub fn is_unit(&self) -> bool {
        self.id == TypeId::of::<()>()
    }

    /// The result half of a registry key: `None` for no-result commands.
    pub(crate) fn key(&self) -> Option<TypeId> {
        if self.is_unit() {
            None
        } else {
            Some(self.id)
        }
    }
}

impl PartialEq for ResultType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ResultType {}

impl fmt::Debug for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResultType").field(&self.name).finish()
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Base capability of every `Command<R>`: lets a caller hold a command as
/// `Box<dyn AnyCommand<R>>` without knowing its concrete type.
pub trait AnyCommand<R>: Send + 'static {
    /// The concrete runtime type, not the trait object's.
    fn message_type(&self) -> MessageType;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<C, R> AnyCommand<R> for C
where
    C: Command<R>,
{
    fn message_type(&self) -> MessageType {
        MessageType::of::<C>()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// Base capability of every `Query<R>`.
pub trait AnyQuery<R>: Send + 'static {
    fn message_type(&self) -> MessageType;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<Q, R> AnyQuery<R> for Q
where
    Q: Query<R>,
{
    fn message_type(&self) -> MessageType {
        MessageType::of::<Q>()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}
