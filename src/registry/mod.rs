//! Handler Registry: owns the message type → handler mapping.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registration feed (register_handlers!, extend, builder)    │
//! │  Registration = (kind, message type, result type, invoker)  │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HandlerRegistry                         │
//! │  HashMap<(kind, TypeId, Option<TypeId>), Registration>      │
//! │  register() / extend() / resolve()                          │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      RegistryStore                          │
//! │  ArcSwap snapshot: lock-free resolve, copy-on-write writes  │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                      │
//!          ▼                                      ▼
//! ┌─────────────────────┐              ┌─────────────────────┐
//! │  CommandDispatcher  │              │   QueryDispatcher   │
//! └─────────────────────┘              └─────────────────────┘
//! ```

mod registration;
mod registry;
mod store;

pub(crate) use registration::BoxedValue;
pub use registration::Registration;
pub use registry::HandlerRegistry;
pub use store::RegistryStore;
