//! `HandlerRegistry`: the (message type, result type) → handler map.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::registration::Registration;
use crate::config::{DispatchConfig, DuplicatePolicy};
use crate::error::DispatchError;
use crate::message::{MessageKind, MessageType, ResultType};

/// Registry key: message kind, exact message type, and result type (`None`
/// for commands without a result).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct HandlerKey {
    kind: MessageKind,
    message: TypeId,
    result: Option<TypeId>,
}

impl HandlerKey {
    fn new(kind: MessageKind, message: MessageType, result: ResultType) -> Self {
        Self {
            kind,
            message: message.id(),
            result: result.key(),
        }
    }
}

/// Maps each (message, result) pair to the single handler bound to it.
///
/// Built during startup with `register` / `extend`, then frozen: a built
/// registry is only read, so it can be shared across tasks without locking.
/// For registration after dispatch has started, wrap it in a
/// `RegistryStore`.
///
/// ## Example
///
/// ```ignore
/// let mut registry = HandlerRegistry::new();
/// registry.register(Registration::command(CreateUserHandler::default()))?;
/// registry.register(Registration::query(GetUserByIdHandler::default()))?;
///
/// let binding = registry.resolve(
///     MessageKind::Query,
///     MessageType::of::<GetUserById>(),
///     ResultType::of::<UserDto>(),
/// )?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    entries: HashMap<HandlerKey, Arc<Registration>>,
    /// Result types bound per (kind, message), in registration order.
    results: HashMap<(MessageKind, TypeId), Vec<ResultType>>,
    policy: DuplicatePolicy,
}

impl HandlerRegistry {
    /// Create an empty registry that rejects duplicate bindings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            entries: HashMap::new(),
            results: HashMap::new(),
            policy,
        }
    }

    pub fn with_config(config: &DispatchConfig) -> Self {
        Self::with_policy(config.duplicate_policy)
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Bind a handler.
    ///
    /// Under `DuplicatePolicy::Reject` an existing binding for the same key
    /// is kept and `DuplicateRegistration` is returned. Under `Replace` the
    /// new binding wins. Query bindings with a unit result are refused with
    /// `QueryWithoutResult`.
    pub fn register(&mut self, registration: Registration) -> Result<(), DispatchError> {
        let kind = registration.kind();
        let message = registration.message_type();
        let result = registration.result_type();
        let key = HandlerKey::new(kind, message, result);

        if kind == MessageKind::Query && result.is_unit() {
            return Err(DispatchError::QueryWithoutResult {
                message: message.name(),
            });
        }

        let replacing = self.entries.contains_key(&key);
        if replacing {
            match self.policy {
                DuplicatePolicy::Reject => {
                    return Err(DispatchError::DuplicateRegistration {
                        kind,
                        message: message.name(),
                        result: result.name(),
                    });
                }
                DuplicatePolicy::Replace => {
                    warn!(%kind, message_type = message.name(), result_type = result.name(), "replacing handler");
                }
            }
        }

        self.entries.insert(key, Arc::new(registration));
        if !replacing {
            self.results
                .entry((kind, message.id()))
                .or_default()
                .push(result);
        }
        debug!(%kind, message_type = message.name(), result_type = result.name(), "handler registered");
        Ok(())
    }

    /// Bulk registration feed. Applies bindings in order and stops at the
    /// first error; bindings before it stay registered.
    pub fn extend<I>(&mut self, registrations: I) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = Registration>,
    {
        for registration in registrations {
            self.register(registration)?;
        }
        Ok(())
    }

    /// Look up the binding for an exact (message, result) key.
    ///
    /// If the message type is bound only to other result types, the error is
    /// `ResultTypeMismatch` naming the first result type registered for it;
    /// if it is not bound at all, `HandlerNotFound`.
    pub fn resolve(
        &self,
        kind: MessageKind,
        message: MessageType,
        result: ResultType,
    ) -> Result<Arc<Registration>, DispatchError> {
        trace!(%kind, message_type = message.name(), result_type = result.name(), "resolving handler");

        if let Some(binding) = self.entries.get(&HandlerKey::new(kind, message, result)) {
            return Ok(Arc::clone(binding));
        }

        let first = self
            .results
            .get(&(kind, message.id()))
            .and_then(|results| results.first().copied());

        match first {
            Some(registered) => {
                let bound = HandlerKey::new(kind, message, registered);
                // Erased sends only know the message by id; take the name
                // from the binding.
                let message = self
                    .entries
                    .get(&bound)
                    .map_or(message, |binding| binding.message_type());
                Err(DispatchError::ResultTypeMismatch {
                    kind,
                    message: message.name(),
                    requested: result.name(),
                    registered: registered.name(),
                })
            }
            None => Err(DispatchError::HandlerNotFound {
                kind,
                message: message.name(),
                result: result.name(),
            }),
        }
    }

    pub fn contains(&self, kind: MessageKind, message: MessageType, result: ResultType) -> bool {
        self.entries
            .contains_key(&HandlerKey::new(kind, message, result))
    }

    /// All bindings, in no particular order.
    pub fn bindings(&self) -> impl Iterator<Item = &Registration> {
        self.entries.values().map(|binding| binding.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
