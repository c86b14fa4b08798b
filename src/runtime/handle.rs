//! Handle to a machine running on its own task.

use crate::runtime::error::MachineError;
use crate::runtime::machine::RunReport;
use crate::runtime::shutdown::ShutdownTrigger;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Returned by [`StateMachine::spawn`](crate::runtime::StateMachine::spawn).
///
/// Dropping the handle detaches the task; the machine keeps running.
#[derive(Debug)]
pub struct MachineHandle {
    id: Uuid,
    join: JoinHandle<Result<RunReport, MachineError>>,
    trigger: ShutdownTrigger,
}

impl MachineHandle {
    pub(crate) fn new(
        id: Uuid,
        join: JoinHandle<Result<RunReport, MachineError>>,
        trigger: ShutdownTrigger,
    ) -> Self {
        Self { id, join, trigger }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ask the machine to stop the next time it waits for an event.
    pub fn shutdown(&self) {
        self.trigger.trigger();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the run to end.
    ///
    /// A panicking callback surfaces as [`MachineError::Join`].
    pub async fn join(self) -> Result<RunReport, MachineError> {
        self.join.await?
    }

    /// Request shutdown and wait for the machine to stop.
    pub async fn stop(self) -> Result<RunReport, MachineError> {
        self.shutdown();
        self.join().await
    }
}
