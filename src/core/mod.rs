//! Core state machine types.
//!
//! - Events via the `Event` trait
//! - States and their identities
//! - The graph that owns the states
//! - Transition history

mod event;
mod graph;
mod history;
mod state;

pub use event::Event;
pub use graph::{GraphError, StateGraph};
pub use history::{StateHistory, TransitionRecord};
pub use state::{Action, AsyncHandler, EventHandler, PureHandler, State, StateId};
