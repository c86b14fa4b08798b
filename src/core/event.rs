//! Event trait for the signals that drive a state machine.
//!
//! Events are expected to be closed enums so that every state's handler can
//! `match` on them exhaustively. Variants may carry payloads; the engine only
//! needs a diagnostic name.

use std::fmt::Debug;

/// Trait for state machine events.
///
/// # Example
///
/// ```rust
/// use turnstile::core::Event;
///
/// #[derive(Debug)]
/// enum DoorEvent {
///     Push,
///     Coin { cents: u32 },
/// }
///
/// impl Event for DoorEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::Push => "Push",
///             Self::Coin { .. } => "Coin",
///         }
///     }
/// }
///
/// assert_eq!(DoorEvent::Coin { cents: 25 }.name(), "Coin");
/// ```
pub trait Event: Debug + Send + 'static {
    /// Get the event's name for logging and history records.
    fn name(&self) -> &str;
}
