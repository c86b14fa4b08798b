//! Builder for constructing states.

use crate::core::{Action, EventHandler, State, StateId};
use futures::future::{self, BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

fn noop() -> Action {
    Arc::new(|| future::ok::<(), anyhow::Error>(()).boxed())
}

/// Builder for states with a fluent API.
///
/// Every behaviour is optional:
/// - entry and exit default to doing nothing
/// - the event handler defaults to ignoring every event
///
/// `build` borrows the builder, so one configuration can stamp out several
/// states. Each of them becomes a separate state once inserted into a graph.
pub struct StateBuilder<E> {
    name: String,
    on_entry: Action,
    on_exit: Action,
    on_event: EventHandler<E>,
}

impl<E: Send + 'static> StateBuilder<E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_entry: noop(),
            on_exit: noop(),
            on_event: EventHandler::Pure(Arc::new(|_: &E| -> Option<StateId> { None })),
        }
    }

    /// Set the entry action.
    ///
    /// The closure runs when the state is entered and the returned future is
    /// awaited before the machine takes the next event.
    pub fn on_entry<F, Fut>(mut self, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_entry = Arc::new(move || -> BoxFuture<'static, anyhow::Result<()>> {
            action().boxed()
        });
        self
    }

    /// Set the exit action.
    pub fn on_exit<F, Fut>(mut self, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_exit = Arc::new(move || -> BoxFuture<'static, anyhow::Result<()>> {
            action().boxed()
        });
        self
    }

    /// Set a synchronous event rule.
    ///
    /// Return `None` to ignore the event, this state's own id to re-enter it,
    /// or another state's id to move there.
    pub fn on_event<F>(mut self, handler: F) -> Self
    where
        F: Fn(&E) -> Option<StateId> + Send + Sync + 'static,
    {
        self.on_event = EventHandler::Pure(Arc::new(handler));
        self
    }

    /// Set an event rule that may suspend or fail.
    pub fn on_event_async<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Option<StateId>>> + Send + 'static,
    {
        self.on_event = EventHandler::Async(Arc::new(
            move |event| -> BoxFuture<'static, anyhow::Result<Option<StateId>>> {
                handler(event).boxed()
            },
        ));
        self
    }

    /// Build the state.
    pub fn build(&self) -> State<E> {
        State {
            name: self.name.clone(),
            on_entry: Arc::clone(&self.on_entry),
            on_exit: Arc::clone(&self.on_exit),
            on_event: self.on_event.clone(),
        }
    }
}

impl<E> Clone for StateBuilder<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            on_entry: Arc::clone(&self.on_entry),
            on_exit: Arc::clone(&self.on_exit),
            on_event: self.on_event.clone(),
        }
    }
}
