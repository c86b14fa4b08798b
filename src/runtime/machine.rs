//! The event loop that drives a state graph.

use crate::builder::StateMachineBuilder;
use crate::config::MachineConfig;
use crate::core::{Event, StateGraph, StateHistory, StateId, TransitionRecord};
use crate::runtime::error::{CallbackPhase, MachineError};
use crate::runtime::handle::MachineHandle;
use crate::runtime::queue::EventReceiver;
use crate::runtime::shutdown::{ShutdownListener, ShutdownTrigger};
use crate::runtime::transition::{transition, Step, TransitionKind};
use chrono::Utc;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// What the observer sees after each processed event.
#[derive(Clone, Debug)]
pub struct StateChange<'a> {
    pub step: Step,
    /// Name of the state the machine is in after the event
    pub state: &'a str,
    /// Name of the event that was processed
    pub event: &'a str,
    /// Position of the event in the machine's input, starting at 1
    pub sequence: u64,
}

/// Hook invoked after every processed event, ignored ones included.
pub type Observer = Arc<dyn Fn(&StateChange<'_>) + Send + Sync>;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The terminal state was reached
    Terminated,
    /// The shutdown trigger fired first
    Cancelled,
}

/// Summary returned by a run that did not fail.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub final_state: StateId,
    pub final_state_name: String,
    pub events_processed: u64,
    pub history: StateHistory,
}

/// An event-driven state machine, ready to run.
///
/// Built with [`StateMachine::builder`]. Running consumes the machine, so each
/// machine has exactly one consumer of its event queue.
pub struct StateMachine<E: Event> {
    pub(crate) id: Uuid,
    pub(crate) config: MachineConfig,
    pub(crate) graph: StateGraph<E>,
    pub(crate) initial: StateId,
    pub(crate) terminal: StateId,
    pub(crate) events: EventReceiver<E>,
    pub(crate) observer: Option<Observer>,
    pub(crate) shutdown: ShutdownListener,
    pub(crate) trigger: ShutdownTrigger,
}

impl<E: Event> StateMachine<E> {
    pub fn builder(graph: StateGraph<E>) -> StateMachineBuilder<E> {
        StateMachineBuilder::new(graph)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn initial_state(&self) -> StateId {
        self.initial
    }

    pub fn terminal_state(&self) -> StateId {
        self.terminal
    }

    /// A handle that stops this machine the next time it waits for an event.
    pub fn shutdown_trigger(&self) -> ShutdownTrigger {
        self.trigger.clone()
    }

    /// Run on a new Tokio task.
    pub fn spawn(self) -> MachineHandle {
        let id = self.id;
        let trigger = self.trigger.clone();
        let join = tokio::spawn(self.run());
        MachineHandle::new(id, join, trigger)
    }

    /// Process events until the terminal state is reached.
    ///
    /// Each event is handled completely (handler, exit, entry) before the next
    /// one is taken from the queue. Returns early with
    /// [`RunOutcome::Cancelled`] if the shutdown trigger fires while waiting.
    pub async fn run(self) -> Result<RunReport, MachineError> {
        let span = tracing::info_span!(
            "state_machine",
            machine = %self.config.name,
            id = %self.id,
        );
        self.run_loop().instrument(span).await
    }

    async fn run_loop(self) -> Result<RunReport, MachineError> {
        let StateMachine {
            config,
            graph,
            initial,
            terminal,
            mut events,
            observer,
            mut shutdown,
            ..
        } = self;

        let mut current = initial;
        let mut history = StateHistory::new();
        let mut sequence = 0u64;

        let start = graph.get(initial).ok_or(MachineError::UnknownState(initial))?;
        tracing::info!(state = start.name(), "Starting");
        if config.enter_initial_state {
            start.enter().await.map_err(|err| {
                tracing::error!(state = start.name(), error = %err, "Initial on_entry failed");
                MachineError::callback(start.name(), CallbackPhase::Entry, err)
            })?;
        }

        while current != terminal {
            let state_name = graph.name(current).unwrap_or_default().to_string();

            let event = tokio::select! {
                biased;
                _ = shutdown.triggered() => {
                    tracing::warn!(state = %state_name, "Shutdown requested, stopping");
                    return Ok(RunReport {
                        outcome: RunOutcome::Cancelled,
                        final_state: current,
                        final_state_name: state_name,
                        events_processed: sequence,
                        history,
                    });
                }
                received = events.recv() => match received {
                    Some(event) => event,
                    None => {
                        tracing::warn!(state = %state_name, "Event source closed");
                        return Err(MachineError::EventSourceClosed { state: state_name });
                    }
                },
            };

            sequence += 1;
            let event_name = event.name().to_string();
            tracing::debug!(state = %state_name, event = %event_name, sequence, "Received event");

            let step = transition(&graph, current, event).await.map_err(|err| {
                tracing::error!(state = %state_name, event = %event_name, error = %err, "Transition failed");
                err
            })?;

            let next_name = graph.name(step.to).unwrap_or_default();
            match step.kind {
                TransitionKind::Ignored => {
                    tracing::debug!(state = %state_name, event = %event_name, "Event ignored");
                }
                TransitionKind::Reentered | TransitionKind::Moved => {
                    tracing::info!(
                        from = %state_name,
                        to = next_name,
                        event = %event_name,
                        kind = ?step.kind,
                        "Transition"
                    );
                    if config.record_history {
                        history.push(
                            TransitionRecord {
                                from: step.from,
                                from_name: state_name.clone(),
                                to: step.to,
                                to_name: next_name.to_string(),
                                event: event_name.clone(),
                                kind: step.kind,
                                sequence,
                                timestamp: Utc::now(),
                            },
                            config.history_limit,
                        );
                    }
                }
            }

            if let Some(observer) = &observer {
                observer(&StateChange {
                    step,
                    state: next_name,
                    event: &event_name,
                    sequence,
                });
            }

            current = step.to;
        }

        let final_state_name = graph.name(current).unwrap_or_default().to_string();
        tracing::info!(state = %final_state_name, events = sequence, "Reached terminal state");
        Ok(RunReport {
            outcome: RunOutcome::Terminated,
            final_state: current,
            final_state_name,
            events_processed: sequence,
            history,
        })
    }
}
