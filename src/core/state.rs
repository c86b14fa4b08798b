//! States and their entry, exit and event behaviours.
//!
//! A [`State`] is immutable once built. It is owned by a
//! [`StateGraph`](crate::core::StateGraph), which hands out a [`StateId`] for
//! every inserted state. Handlers name their successor by that id, which keeps
//! identity separate from the state's contents: two states built from the same
//! configuration are still two different states.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Identity of a state inside a graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct StateId(Uuid);

impl StateId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entry or exit action. Called once per entry/exit and awaited to completion.
pub type Action = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Synchronous event rule. Must be pure so it can also be probed by the validator.
pub type PureHandler<E> = Arc<dyn Fn(&E) -> Option<StateId> + Send + Sync>;

/// Event rule that may suspend or fail.
pub type AsyncHandler<E> =
    Arc<dyn Fn(E) -> BoxFuture<'static, anyhow::Result<Option<StateId>>> + Send + Sync>;

/// How a state reacts to an event.
///
/// `None` ignores the event, `Some(own id)` re-enters the state and any other
/// id moves the machine there.
pub enum EventHandler<E> {
    Pure(PureHandler<E>),
    Async(AsyncHandler<E>),
}

impl<E> Clone for EventHandler<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Pure(handler) => Self::Pure(Arc::clone(handler)),
            Self::Async(handler) => Self::Async(Arc::clone(handler)),
        }
    }
}

/// A named node of the state graph.
pub struct State<E> {
    pub(crate) name: String,
    pub(crate) on_entry: Action,
    pub(crate) on_exit: Action,
    pub(crate) on_event: EventHandler<E>,
}

impl<E: Send + 'static> State<E> {
    /// Start building a state with no-op actions and a handler that ignores everything.
    pub fn builder(name: impl Into<String>) -> crate::builder::StateBuilder<E> {
        crate::builder::StateBuilder::new(name)
    }

    /// Get the state's name for display/logging.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the entry action.
    pub async fn enter(&self) -> anyhow::Result<()> {
        (self.on_entry)().await
    }

    /// Run the exit action.
    pub async fn exit(&self) -> anyhow::Result<()> {
        (self.on_exit)().await
    }

    /// Ask the state where `event` leads.
    pub async fn handle(&self, event: E) -> anyhow::Result<Option<StateId>> {
        match &self.on_event {
            EventHandler::Pure(handler) => Ok(handler(&event)),
            EventHandler::Async(handler) => handler(event).await,
        }
    }

    /// Evaluate a pure handler without consuming the event.
    ///
    /// Returns `None` when the handler is async and cannot be evaluated
    /// without side effects.
    pub fn probe(&self, event: &E) -> Option<Option<StateId>> {
        match &self.on_event {
            EventHandler::Pure(handler) => Some(handler(event)),
            EventHandler::Async(_) => None,
        }
    }
}

impl<E> Clone for State<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            on_entry: Arc::clone(&self.on_entry),
            on_exit: Arc::clone(&self.on_exit),
            on_event: self.on_event.clone(),
        }
    }
}

impl<E> fmt::Debug for State<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handler = match self.on_event {
            EventHandler::Pure(_) => "pure",
            EventHandler::Async(_) => "async",
        };
        f.debug_struct("State")
            .field("name", &self.name)
            .field("on_event", &handler)
            .finish()
    }
}
