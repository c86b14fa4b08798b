//! Build errors for the state machine builder.

use crate::core::StateId;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Terminal state not specified. Call .terminal(state) before .build()")]
    MissingTerminalState,

    #[error("Event source not specified. Call .events(receiver) before .build()")]
    MissingEventSource,

    #[error("The {role} state {id} is not part of the graph")]
    UnknownState { role: &'static str, id: StateId },

    #[error("Reserved states were never defined: {}", names.join(", "))]
    UndefinedStates { names: Vec<String> },
}
