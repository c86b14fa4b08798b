//! Problems the graph validator can find.

use thiserror::Error;

/// A structural problem in a state graph.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphViolation {
    #[error("The {role} state is not part of the graph")]
    UnknownState { role: &'static str },

    #[error("State '{state}' was reserved but never defined")]
    UndefinedState { state: String },

    #[error("State '{state}' handles '{event}' by moving to a state outside the graph")]
    DanglingTransition { state: String, event: String },

    #[error("State '{state}' uses an async handler whose transitions cannot be inspected")]
    OpaqueHandler { state: String },

    #[error("State '{state}' cannot be reached from the initial state")]
    UnreachableState { state: String },

    #[error("Terminal state '{state}' cannot be reached from the initial state")]
    TerminalUnreachable { state: String },

    #[error("Terminal state '{state}' handles '{event}', but a finished machine takes no events")]
    TerminalHasTransitions { state: String, event: String },
}
