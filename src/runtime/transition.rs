//! The transition algorithm.

use crate::core::{StateGraph, StateId};
use crate::runtime::error::{CallbackPhase, MachineError};
use serde::{Deserialize, Serialize};

/// What a processed event did to the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// The handler declined the event; no callbacks ran
    Ignored,
    /// The handler returned the current state; exit then entry ran
    Reentered,
    /// The handler returned another state; exit then the next entry ran
    Moved,
}

/// Result of applying one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub from: StateId,
    pub to: StateId,
    pub kind: TransitionKind,
}

/// Apply `event` to the state `current`.
///
/// The state's handler picks the successor. When it declines, nothing else
/// happens. Otherwise the current state's exit action runs to completion,
/// then the successor's entry action, even when the successor is the current
/// state itself.
///
/// The successor is resolved before any action runs, so an unknown target
/// leaves the machine untouched. A failing action stops the transition
/// immediately.
pub async fn transition<E: Send + 'static>(
    graph: &StateGraph<E>,
    current: StateId,
    event: E,
) -> Result<Step, MachineError> {
    let state = graph
        .get(current)
        .ok_or(MachineError::UnknownState(current))?;

    let next = state
        .handle(event)
        .await
        .map_err(|err| MachineError::callback(state.name(), CallbackPhase::Event, err))?;

    let Some(next) = next else {
        return Ok(Step {
            from: current,
            to: current,
            kind: TransitionKind::Ignored,
        });
    };

    let next_state = graph
        .get(next)
        .ok_or_else(|| MachineError::DanglingTransition {
            from: state.name().to_string(),
            target: next,
        })?;

    state
        .exit()
        .await
        .map_err(|err| MachineError::callback(state.name(), CallbackPhase::Exit, err))?;
    next_state
        .enter()
        .await
        .map_err(|err| MachineError::callback(next_state.name(), CallbackPhase::Entry, err))?;

    let kind = if next == current {
        TransitionKind::Reentered
    } else {
        TransitionKind::Moved
    };

    Ok(Step {
        from: current,
        to: next,
        kind,
    })
}
