//! Handler: CreateUser (no result)

use cqrs_dispatch::{async_trait, CancellationToken, CommandHandler, HandlerError, Registration};

use crate::support::{CreateUser, Recorder, UserStore};

pub struct Handler {
    pub store: UserStore,
    pub calls: Recorder<CreateUser>,
}

impl Handler {
    pub fn new(store: UserStore) -> Self {
        Self {
            store,
            calls: Recorder::new(),
        }
    }
}

#[async_trait]
impl CommandHandler for Handler {
    type Command = CreateUser;
    type Output = ();

    async fn handle(
        &self,
        command: CreateUser,
        _cancel: CancellationToken,
    ) -> Result<(), HandlerError> {
        self.calls.record(command.clone());

        if command.name.trim().is_empty() {
            return Err(HandlerError::Rejected("name must not be empty".into()));
        }

        self.store.insert(&command.name);
        Ok(())
    }
}

pub fn registration(store: &UserStore) -> Registration {
    Registration::command(Handler::new(store.clone()))
}
