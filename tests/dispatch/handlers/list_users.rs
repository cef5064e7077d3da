//! Handler: ListUsers -> Vec<UserDto>

use cqrs_dispatch::{async_trait, CancellationToken, HandlerError, QueryHandler, Registration};

use crate::support::{ListUsers, UserDto, UserStore};

pub struct Handler {
    pub store: UserStore,
}

#[async_trait]
impl QueryHandler for Handler {
    type Query = ListUsers;
    type Output = Vec<UserDto>;

    async fn handle(
        &self,
        _query: ListUsers,
        _cancel: CancellationToken,
    ) -> Result<Vec<UserDto>, HandlerError> {
        Ok(self.store.all())
    }
}

pub fn registration(store: &UserStore) -> Registration {
    Registration::query(Handler {
        store: store.clone(),
    })
}
