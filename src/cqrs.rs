//! `Cqrs`: a registry wired to both dispatchers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cqrs_dispatch::Cqrs;
//!
//! let cqrs = Cqrs::builder()
//!     .command(CreateUserHandler::new(users.clone()))
//!     .query(GetUserByIdHandler::new(users.clone()))
//!     .build()?;
//!
//! cqrs.commands().send(CreateUser { name: "Alice".into() }).await?;
//! let user: UserDto = cqrs.queries().send(GetUserById { id: 1 }).await?;
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::DispatchConfig;
use crate::dispatch::{CommandDispatcher, QueryDispatcher};
use crate::error::DispatchError;
use crate::handler::{CommandHandler, QueryHandler};
use crate::registry::{HandlerRegistry, Registration, RegistryStore};

/// A handler registry shared by a command dispatcher and a query dispatcher.
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone)]
pub struct Cqrs {
    registry: Arc<RegistryStore>,
    commands: CommandDispatcher,
    queries: QueryDispatcher,
}

impl fmt::Debug for Cqrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cqrs").finish_non_exhaustive()
    }
}

impl Cqrs {
    pub fn builder() -> CqrsBuilder {
        CqrsBuilder::default()
    }

    /// Wire dispatchers over an already-built registry.
    pub fn from_registry(registry: HandlerRegistry) -> Self {
        let registry = Arc::new(RegistryStore::new(registry));
        Self {
            commands: CommandDispatcher::new(Arc::clone(&registry)),
            queries: QueryDispatcher::new(Arc::clone(&registry)),
            registry,
        }
    }

    pub fn commands(&self) -> &CommandDispatcher {
        &self.commands
    }

    pub fn queries(&self) -> &QueryDispatcher {
        &self.queries
    }

    pub fn registry(&self) -> &Arc<RegistryStore> {
        &self.registry
    }

    /// Add a binding after startup. Dispatches already resolving keep the
    /// snapshot they loaded; later dispatches see the new binding.
    pub fn register(&self, registration: Registration) -> Result<(), DispatchError> {
        self.registry.register(registration)
    }
}

/// Collects bindings and builds a `Cqrs`.
///
/// Uses builder pattern: each method returns `self` for chaining.
/// Registration errors (duplicates under `DuplicatePolicy::Reject`) surface
/// from `build()`.
#[derive(Default)]
pub struct CqrsBuilder {
    config: DispatchConfig,
    registrations: Vec<Registration>,
}

impl CqrsBuilder {
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a shared command handler.
    pub fn command<H: CommandHandler>(self, handler: H) -> Self {
        self.register(Registration::command(handler))
    }

    /// Register a command handler factory, called once per dispatch.
    pub fn command_factory<H, F>(self, factory: F) -> Self
    where
        H: CommandHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.register(Registration::command_factory(factory))
    }

    /// Register a shared query handler.
    pub fn query<H: QueryHandler>(self, handler: H) -> Self {
        self.register(Registration::query(handler))
    }

    /// Register a query handler factory, called once per dispatch.
    pub fn query_factory<H, F>(self, factory: F) -> Self
    where
        H: QueryHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.register(Registration::query_factory(factory))
    }

    pub fn register(mut self, registration: Registration) -> Self {
        self.registrations.push(registration);
        self
    }

    pub fn registrations<I>(mut self, registrations: I) -> Self
    where
        I: IntoIterator<Item = Registration>,
    {
        self.registrations.extend(registrations);
        self
    }

    pub fn build(self) -> Result<Cqrs, DispatchError> {
        let mut registry = HandlerRegistry::with_config(&self.config);
        registry.extend(self.registrations)?;
        Ok(Cqrs::from_registry(registry))
    }
}

/// Register handler modules with a builder using the convention pattern.
///
/// Each handler module must export `registration() -> Registration`:
///
/// ```ignore
/// // src/handlers/create_user.rs
/// pub struct Handler { .. }
///
/// #[async_trait]
/// impl CommandHandler for Handler { .. }
///
/// pub fn registration() -> Registration {
///     Registration::command(Handler::default())
/// }
/// ```
///
/// Handlers that need shared dependencies export
/// `registration(deps: &D) -> Registration` instead and are registered with
/// the `with deps;` form. The dependency expression is evaluated once.
///
/// # Example
/// ```ignore
/// let cqrs = cqrs_dispatch::register_handlers!(
///     Cqrs::builder(),
///     handlers::create_user,
///     handlers::get_user_by_id,
/// )
/// .build()?;
///
/// let cqrs = cqrs_dispatch::register_handlers!(
///     Cqrs::builder(),
///     with store.clone();
///     handlers::create_user,
///     handlers::get_user_by_id,
/// )
/// .build()?;
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($builder:expr, with $deps:expr; $( $($seg:ident)::+ ),+ $(,)?) => {{
        let deps = $deps;
        $builder
        $(
            .register($($seg)::+::registration(&deps))
        )+
    }};
    ($builder:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $builder
        $(
            .register($($seg)::+::registration())
        )+
    };
}
