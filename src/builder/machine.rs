//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::core::{Event, StateGraph, StateId};
use crate::runtime::{EventReceiver, Observer, StateChange, StateMachine};
use crate::runtime::shutdown::shutdown_signal;
use std::sync::Arc;
use uuid::Uuid;

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<E: Event> {
    graph: StateGraph<E>,
    initial: Option<StateId>,
    terminal: Option<StateId>,
    events: Option<EventReceiver<E>>,
    config: MachineConfig,
    observer: Option<Observer>,
}

impl<E: Event> StateMachineBuilder<E> {
    /// Create a new builder that owns `graph`.
    pub fn new(graph: StateGraph<E>) -> Self {
        Self {
            graph,
            initial: None,
            terminal: None,
            events: None,
            config: MachineConfig::default(),
            observer: None,
        }
    }

    /// Set the starting state (required).
    pub fn initial(mut self, state: StateId) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the state that ends the run (required).
    pub fn terminal(mut self, state: StateId) -> Self {
        self.terminal = Some(state);
        self
    }

    /// Set the queue the machine reads events from (required).
    pub fn events(mut self, receiver: EventReceiver<E>) -> Self {
        self.events = Some(receiver);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the name used in logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Call `observer` after every processed event.
    pub fn observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&StateChange<'_>) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Build the state machine.
    /// Returns an error if required fields are missing or name unknown states.
    pub fn build(self) -> Result<StateMachine<E>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let terminal = self.terminal.ok_or(BuildError::MissingTerminalState)?;
        let events = self.events.ok_or(BuildError::MissingEventSource)?;

        for (role, id) in [("initial", initial), ("terminal", terminal)] {
            if !self.graph.contains(id) {
                return Err(BuildError::UnknownState { role, id });
            }
        }

        let undefined = self.graph.undefined();
        if !undefined.is_empty() {
            let names = undefined
                .into_iter()
                .filter_map(|id| self.graph.name(id).map(str::to_string))
                .collect();
            return Err(BuildError::UndefinedStates { names });
        }

        let (trigger, shutdown) = shutdown_signal();
        Ok(StateMachine {
            id: Uuid::new_v4(),
            config: self.config,
            graph: self.graph,
            initial,
            terminal,
            events,
            observer: self.observer,
            shutdown,
            trigger,
        })
    }
}
