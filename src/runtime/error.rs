//! Errors raised while a machine runs.

use crate::core::StateId;
use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which callback failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackPhase {
    Entry,
    Exit,
    Event,
}

impl fmt::Display for CallbackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Entry => "on_entry",
            Self::Exit => "on_exit",
            Self::Event => "on_event",
        };
        f.write_str(name)
    }
}

/// Errors that stop a running machine.
///
/// None of these are recovered from. After a `Callback` error the machine may
/// have run an exit action without the matching entry.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("{phase} callback of state '{state}' failed")]
    Callback {
        state: String,
        phase: CallbackPhase,
        #[source]
        source: BoxError,
    },

    #[error("State '{from}' transitioned to {target}, which is not part of the graph")]
    DanglingTransition { from: String, target: StateId },

    #[error("State {0} is not part of the graph")]
    UnknownState(StateId),

    #[error("Event source closed while in state '{state}'")]
    EventSourceClosed { state: String },

    #[error("State machine task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl MachineError {
    pub(crate) fn callback(state: &str, phase: CallbackPhase, source: anyhow::Error) -> Self {
        Self::Callback {
            state: state.to_string(),
            phase,
            source: source.into(),
        }
    }
}
