//! Statically typed command dispatch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cqrs_dispatch::{Cqrs, DispatchError, HandlerError, MessageKind};

use crate::handlers::{self, create_user, register_user};
use crate::support::{CreateUser, DeleteUser, RegisterUser, RenameUser, UserId, UserStore};

// ============================================================================
// Commands without a result
// ============================================================================

#[tokio::test]
async fn create_user_runs_its_handler_once_with_the_sent_value() {
    let store = UserStore::new();
    let handler = create_user::Handler::new(store.clone());
    let calls = handler.calls.clone();
    let cqrs = Cqrs::builder().command(handler).build().unwrap();

    cqrs.commands()
        .send(CreateUser {
            name: "Alice".into(),
        })
        .await
        .unwrap();

    assert_eq!(
        calls.calls(),
        vec![CreateUser {
            name: "Alice".into()
        }]
    );
    assert_eq!(store.find_by_name("Alice").map(|u| u.id), Some(1));
}

#[tokio::test]
async fn unregistered_command_is_handler_not_found() {
    let cqrs = handlers::cqrs(&UserStore::new());

    let err = cqrs.commands().send(DeleteUser { id: 1 }).await.unwrap_err();

    match err {
        DispatchError::HandlerNotFound {
            kind,
            message,
            result,
        } => {
            assert_eq!(kind, MessageKind::Command);
            assert!(message.ends_with("DeleteUser"));
            assert!(result.ends_with("()"));
        }
        other => panic!("expected HandlerNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn handler_failure_is_returned_unchanged() {
    let store = UserStore::new();
    let cqrs = handlers::cqrs(&store);

    let err = cqrs
        .commands()
        .send(CreateUser { name: "  ".into() })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DispatchError::Handler(HandlerError::Rejected(ref msg)) if msg == "name must not be empty"
    ));
    assert_eq!(err.to_string(), "rejected: name must not be empty");
    assert!(store.all().is_empty());
}

#[tokio::test]
async fn rename_reports_missing_user() {
    let store = UserStore::seeded(&[(7, "Grace")]);
    let cqrs = handlers::cqrs(&store);

    cqrs.commands()
        .send(RenameUser {
            id: 7,
            name: "Grace Hopper".into(),
        })
        .await
        .unwrap();
    assert_eq!(store.get(7).unwrap().name, "Grace Hopper");

    let err = cqrs
        .commands()
        .send(RenameUser {
            id: 8,
            name: "Nobody".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.into_handler_error(),
        Some(HandlerError::NotFound(ref id)) if id == "user 8"
    ));
}

// ============================================================================
// Commands with a result
// ============================================================================

#[tokio::test]
async fn send_returning_yields_the_handler_result() {
    let store = UserStore::new();
    let cqrs = handlers::cqrs(&store);

    let first: UserId = cqrs
        .commands()
        .send_returning(RegisterUser { name: "Ada".into() })
        .await
        .unwrap();
    let second: UserId = cqrs
        .commands()
        .send_returning(RegisterUser { name: "Linus".into() })
        .await
        .unwrap();

    assert_eq!(first, UserId(1));
    assert_eq!(second, UserId(2));
    assert_eq!(store.get(2).unwrap().name, "Linus");
}

#[tokio::test]
async fn rejected_registration_passes_through() {
    let store = UserStore::seeded(&[(1, "Ada")]);
    let handler = register_user::Handler::new(store.clone());
    let calls = handler.calls.clone();
    let cqrs = Cqrs::builder().command(handler).build().unwrap();

    let err = cqrs
        .commands()
        .send_returning::<_, UserId>(RegisterUser { name: "Ada".into() })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "rejected: user Ada already exists");
    assert_eq!(calls.calls().len(), 1);
}

#[tokio::test]
async fn factory_builds_a_handler_per_dispatch() {
    let store = UserStore::new();
    let built = Arc::new(AtomicUsize::new(0));

    let factory_store = store.clone();
    let factory_built = Arc::clone(&built);
    let cqrs = Cqrs::builder()
        .command_factory(move || {
            factory_built.fetch_add(1, Ordering::SeqCst);
            register_user::Handler::new(factory_store.clone())
        })
        .build()
        .unwrap();

    assert_eq!(built.load(Ordering::SeqCst), 0);

    for name in ["a", "b", "c"] {
        cqrs.commands()
            .send_returning::<_, UserId>(RegisterUser { name: name.into() })
            .await
            .unwrap();
    }

    assert_eq!(built.load(Ordering::SeqCst), 3);
    assert_eq!(store.all().len(), 3);
}
