//! State transition history tracking.
//!
//! Records every transition a machine performed (re-entries included) so a
//! finished run can be inspected or exported for diagnostics.

use super::state::StateId;
use crate::runtime::TransitionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: StateId,
    pub from_name: String,
    pub to: StateId,
    pub to_name: String,
    /// Name of the event that caused the transition
    pub event: String,
    pub kind: TransitionKind,
    /// Position of the event in the machine's input, starting at 1
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of transitions.
///
/// [`record`](Self::record) is pure and returns a new history. The run loop
/// appends in place and honours an optional size limit, keeping the newest
/// records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<TransitionRecord>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is not modified.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    pub(crate) fn push(&mut self, transition: TransitionRecord, limit: Option<usize>) {
        self.transitions.push(transition);
        if let Some(limit) = limit {
            let excess = self.transitions.len().saturating_sub(limit);
            self.transitions.drain(..excess);
        }
    }

    /// Names of the states traversed.
    ///
    /// Returns the `from` state of the first record, then the `to` state of
    /// every record.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from_name.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to_name.as_str());
        }
        path
    }

    /// Time between the first and last recorded transitions.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
