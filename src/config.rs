//! Runtime configuration for a state machine.

use serde::{Deserialize, Serialize};

/// History records kept by default. A machine that never reaches its terminal
/// state must not grow without bound.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// Settings that shape how a machine runs.
///
/// Every field has a default, so a partial document deserializes cleanly and
/// the struct can be embedded in an application's own configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Name used in tracing spans and error messages
    pub name: String,

    /// Run the starting state's entry action before the first event
    pub enter_initial_state: bool,

    /// Keep a [`StateHistory`](crate::core::StateHistory) of the run
    pub record_history: bool,

    /// Keep only the newest N history records. `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            name: "state-machine".to_string(),
            enter_initial_state: false,
            record_history: true,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl MachineConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
