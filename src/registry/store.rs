//! `RegistryStore`: a shared registry that still accepts late registration.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use super::registration::Registration;
use super::registry::HandlerRegistry;
use crate::error::DispatchError;
use crate::message::{MessageKind, MessageType, ResultType};

/// Thread-safe wrapper around `HandlerRegistry` with atomic snapshot swap.
///
/// Readers load the current snapshot without locking. Writers are serialised,
/// copy the current snapshot, apply their bindings, and swap the result in,
/// so a reader sees either the old map or the new one, never a partial
/// update.
pub struct RegistryStore {
    current: ArcSwap<HandlerRegistry>,
    writer: Mutex<()>,
}

impl RegistryStore {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
            writer: Mutex::new(()),
        }
    }

    /// A consistent snapshot of the current bindings.
    pub fn load_full(&self) -> Arc<HandlerRegistry> {
        self.current.load_full()
    }

    pub fn resolve(
        &self,
        kind: MessageKind,
        message: MessageType,
        result: ResultType,
    ) -> Result<Arc<Registration>, DispatchError> {
        self.current.load().resolve(kind, message, result)
    }

    /// Add one binding, following the registry's duplicate policy.
    pub fn register(&self, registration: Registration) -> Result<(), DispatchError> {
        self.extend(std::iter::once(registration))
    }

    /// Add several bindings as one swap. If any binding fails, none of them
    /// become visible.
    pub fn extend<I>(&self, registrations: I) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = Registration>,
    {
        // The guarded value is (), so a poisoned lock carries no broken state.
        let _writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut next = HandlerRegistry::clone(&self.current.load_full());
        next.extend(registrations)?;
        self.current.store(Arc::new(next));
        Ok(())
    }
}

impl Default for RegistryStore {
    fn default() -> Self {
        Self::new(HandlerRegistry::new())
    }
}

impl From<HandlerRegistry> for RegistryStore {
    fn from(registry: HandlerRegistry) -> Self {
        Self::new(registry)
    }
}
