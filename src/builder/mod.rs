//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders for states and machines, plus the
//! `event_enum!` macro for declaring events with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;
pub mod state;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use state::StateBuilder;

use crate::core::{Event, State, StateGraph, StateId};

/// Insert a state that ignores every event and has no actions.
///
/// Handy for terminal states, which the run loop never asks to handle events.
///
/// # Example
///
/// ```
/// use turnstile::builder::terminal_state;
/// use turnstile::core::StateGraph;
/// use turnstile::event_enum;
///
/// event_enum! {
///     enum Step {
///         Next,
///     }
/// }
///
/// let mut graph = StateGraph::<Step>::new();
/// let done = terminal_state(&mut graph, "Done");
/// assert_eq!(graph.name(done), Some("Done"));
/// ```
pub fn terminal_state<E: Event>(graph: &mut StateGraph<E>, name: impl Into<String>) -> StateId {
    graph.insert(State::builder(name).build())
}
