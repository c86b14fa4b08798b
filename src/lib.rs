//! Turnstile: an event-driven finite state machine engine
//!
//! States carry optional entry and exit actions and a rule that maps each
//! event to the next state. A machine reads events from an unbounded queue,
//! applies one at a time, and stops when it reaches its terminal state.
//!
//! # Core Concepts
//!
//! - **Event**: a closed enum of signals, matched exhaustively by each state
//! - **State**: a name, entry/exit actions and an event rule, built with `StateBuilder`
//! - **StateGraph**: owns the states and gives each one an identity
//! - **StateMachine**: the single-consumer run loop, fed by any number of `EventSender`s
//!
//! Returning `None` from an event rule ignores the event. Returning the current
//! state re-enters it, running exit and then entry. Returning another state
//! runs the current exit action, then the next state's entry action.
//!
//! # Example
//!
//! ```rust
//! use turnstile::builder::terminal_state;
//! use turnstile::core::{State, StateGraph};
//! use turnstile::event_enum;
//! use turnstile::runtime::{event_queue, RunOutcome, StateMachine};
//!
//! event_enum! {
//!     pub enum Coin {
//!         Insert,
//!         Push,
//!     }
//! }
//!
//! # tokio_test();
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn tokio_test() {
//! let mut graph = StateGraph::new();
//! let done = terminal_state(&mut graph, "Done");
//! let unlocked = graph.insert(
//!     State::builder("Unlocked")
//!         .on_event(move |event: &Coin| match event {
//!             Coin::Insert => None,
//!             Coin::Push => Some(done),
//!         })
//!         .build(),
//! );
//! let locked = graph.insert(
//!     State::builder("Locked")
//!         .on_entry(|| async { Ok(()) })
//!         .on_event(move |event: &Coin| match event {
//!             Coin::Insert => Some(unlocked),
//!             Coin::Push => None,
//!         })
//!         .build(),
//! );
//!
//! let (tx, rx) = event_queue();
//! let machine = StateMachine::builder(graph)
//!     .initial(locked)
//!     .terminal(done)
//!     .events(rx)
//!     .build()
//!     .unwrap();
//!
//! tx.send(Coin::Insert).unwrap();
//! tx.send(Coin::Push).unwrap();
//!
//! let report = machine.run().await.unwrap();
//! assert_eq!(report.outcome, RunOutcome::Terminated);
//! assert_eq!(report.history.get_path(), vec!["Locked", "Unlocked", "Done"]);
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod runtime;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, StateBuilder, StateMachineBuilder};
pub use config::MachineConfig;
pub use crate::core::{Event, State, StateGraph, StateHistory, StateId};
pub use runtime::{
    event_queue, EventReceiver, EventSender, MachineError, MachineHandle, RunOutcome, RunReport,
    StateMachine,
};
