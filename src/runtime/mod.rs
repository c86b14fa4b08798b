//! Asynchronous execution of a state graph on Tokio.
//!
//! - **Queue**: unbounded FIFO channel carrying events from any number of
//!   producers to the one running machine
//! - **Transition**: applies one event with exit-before-entry ordering
//! - **Machine**: the run loop, from the starting state to the terminal one
//! - **Handle**: joins or stops a machine spawned on its own task

mod error;
mod handle;
mod machine;
mod queue;
pub(crate) mod shutdown;
mod transition;

pub use error::{BoxError, CallbackPhase, MachineError};
pub use handle::MachineHandle;
pub use machine::{Observer, RunOutcome, RunReport, StateChange, StateMachine};
pub use queue::{event_queue, EventReceiver, EventSender, QueueClosed};
pub use shutdown::ShutdownTrigger;
pub use transition::{transition, Step, TransitionKind};
