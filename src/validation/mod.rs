//! Validation of state graphs.
//!
//! The run loop does not reject malformed graphs: a state nobody can reach,
//! or a terminal state the machine can never arrive at, simply leaves the
//! machine waiting. This module checks a graph up front and uses Stillwater's
//! `Validation` type to report every problem in one pass.
//!
//! # Example
//!
//! ```rust
//! use turnstile::builder::terminal_state;
//! use turnstile::core::{State, StateGraph};
//! use turnstile::event_enum;
//! use turnstile::validation::GraphValidator;
//!
//! event_enum! {
//!     enum Light {
//!         Toggle,
//!     }
//! }
//!
//! let mut graph = StateGraph::new();
//! let off = terminal_state(&mut graph, "Off");
//! let on = graph.insert(State::builder("On").on_event(move |_: &Light| Some(off)).build());
//!
//! let result = GraphValidator::new(&graph)
//!     .initial(on)
//!     .terminal(off)
//!     .events(Light::VARIANTS)
//!     .validate();
//! assert!(result.is_success());
//! ```

pub mod validator;
pub mod violations;

pub use validator::GraphValidator;
pub use violations::GraphViolation;
