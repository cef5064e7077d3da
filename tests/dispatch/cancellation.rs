//! Cancellation tokens are forwarded to handlers untouched.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cqrs_dispatch::{
    async_trait, AnyCommand, CancellationToken, Command, CommandHandler, Cqrs, DispatchError,
    HandlerError, Query, QueryHandler,
};

/// Command: wait until cancelled (or give up after a long time).
#[derive(Command)]
struct Wait;

struct WaitHandler {
    started: Arc<tokio::sync::Notify>,
}

#[async_trait]
impl CommandHandler for WaitHandler {
    type Command = Wait;
    type Output = ();

    async fn handle(&self, _: Wait, cancel: CancellationToken) -> Result<(), HandlerError> {
        self.started.notify_one();
        tokio::select! {
            _ = cancel.cancelled() => Err(HandlerError::Cancelled),
            _ = tokio::time::sleep(Duration::from_secs(30)) => Ok(()),
        }
    }
}

/// Query: report whether the token the handler received is cancelled.
#[derive(Query)]
#[query(result = bool)]
struct TokenState;

struct TokenStateHandler {
    invoked: Arc<AtomicUsize>,
}

#[async_trait]
impl QueryHandler for TokenStateHandler {
    type Query = TokenState;
    type Output = bool;

    async fn handle(&self, _: TokenState, cancel: CancellationToken) -> Result<bool, HandlerError> {
        self.invoked.fetch_add(1, Ordering::SeqCst);
        Ok(cancel.is_cancelled())
    }
}

/// Command counterpart of `TokenState`.
#[derive(Command)]
#[command(result = bool)]
struct CheckToken;

struct CheckTokenHandler {
    invoked: Arc<AtomicUsize>,
}

#[async_trait]
impl CommandHandler for CheckTokenHandler {
    type Command = CheckToken;
    type Output = bool;

    async fn handle(
        &self,
        _: CheckToken,
        cancel: CancellationToken,
    ) -> Result<bool, HandlerError> {
        self.invoked.fetch_add(1, Ordering::SeqCst);
        Ok(cancel.is_cancelled())
    }
}

fn token_state_cqrs() -> (Cqrs, Arc<AtomicUsize>) {
    let invoked = Arc::new(AtomicUsize::new(0));
    let cqrs = Cqrs::builder()
        .query(TokenStateHandler {
            invoked: Arc::clone(&invoked),
        })
        .command(CheckTokenHandler {
            invoked: Arc::clone(&invoked),
        })
        .build()
        .unwrap();
    (cqrs, invoked)
}

fn cancelled_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    cancel.cancel();
    cancel
}

#[tokio::test]
async fn cancelling_mid_flight_reaches_the_handler() {
    let started = Arc::new(tokio::sync::Notify::new());
    let cqrs = Cqrs::builder()
        .command(WaitHandler {
            started: Arc::clone(&started),
        })
        .build()
        .unwrap();

    let cancel = CancellationToken::new();
    let commands = cqrs.commands().clone();
    let task_cancel = cancel.clone();
    let task = tokio::spawn(async move { commands.send_with_cancel(Wait, task_cancel).await });

    started.notified().await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("handler did not observe cancellation")
        .unwrap();
    assert!(matches!(
        result,
        Err(DispatchError::Handler(HandlerError::Cancelled))
    ));
}

#[tokio::test]
async fn plain_send_passes_a_live_token() {
    let (cqrs, _) = token_state_cqrs();

    let cancelled: bool = cqrs.queries().send(TokenState).await.unwrap();
    assert!(!cancelled);
}

#[tokio::test]
async fn already_cancelled_token_is_still_delivered() {
    let (cqrs, invoked) = token_state_cqrs();

    let cancel = CancellationToken::new();
    cancel.cancel();

    // The dispatcher does not short-circuit; the handler decides.
    let cancelled: bool = cqrs
        .queries()
        .send_with_cancel(TokenState, cancel.clone())
        .await
        .unwrap();
    assert!(cancelled);

    let through_base: Box<dyn cqrs_dispatch::AnyQuery<bool>> = Box::new(TokenState);
    let cancelled = cqrs
        .queries()
        .send_dyn_with_cancel(through_base, cancel)
        .await
        .unwrap();
    assert!(cancelled);

    assert_eq!(invoked.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn every_command_shape_forwards_the_token() {
    let (cqrs, invoked) = token_state_cqrs();
    let commands = cqrs.commands();

    let cancelled: bool = commands
        .send_returning_with_cancel(CheckToken, cancelled_token())
        .await
        .unwrap();
    assert!(cancelled);

    let through_base: Box<dyn AnyCommand<bool>> = Box::new(CheckToken);
    let cancelled = commands
        .send_dyn_with_cancel(through_base, cancelled_token())
        .await
        .unwrap();
    assert!(cancelled);

    let untyped: Box<dyn Any + Send> = Box::new(CheckToken);
    let cancelled: bool = commands
        .send_any_with_cancel(untyped, cancelled_token())
        .await
        .unwrap();
    assert!(cancelled);

    let live: bool = commands
        .send_returning_with_cancel(CheckToken, CancellationToken::new())
        .await
        .unwrap();
    assert!(!live);

    assert_eq!(invoked.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn untyped_query_forwards_the_token() {
    let (cqrs, invoked) = token_state_cqrs();

    let untyped: Box<dyn Any + Send> = Box::new(TokenState);
    let cancelled: bool = cqrs
        .queries()
        .send_any_with_cancel(untyped, cancelled_token())
        .await
        .unwrap();
    assert!(cancelled);
    assert_eq!(invoked.load(Ordering::SeqCst), 1);
}
