//! Background job channel between worker threads and the controller.
//!
//! Worker threads send one message per finished job; the controller drains
//! the channel once per frame.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::time::Duration;

use crate::engine::{TrainingError, TrainingRun};

/// Messages delivered back to the controller from worker threads.
pub(crate) enum JobMessage {
    /// The blocking training call returned.
    TrainingFinished {
        /// Outcome of the engine call.
        result: Result<TrainingRun, TrainingError>,
        /// Wall-clock duration of the call.
        elapsed: Duration,
    },
}

/// Channel endpoints plus in-flight bookkeeping.
pub(crate) struct JobRuntime {
    tx: Sender<JobMessage>,
    rx: Receiver<JobMessage>,
    training_in_flight: bool,
}

impl JobRuntime {
    pub(crate) fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            training_in_flight: false,
        }
    }

    /// Sender handle for a worker thread.
    pub(crate) fn message_sender(&self) -> Sender<JobMessage> {
        self.tx.clone()
    }

    /// Next pending message, if any.
    pub(crate) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.rx.try_recv()
    }

    /// Mark a training job as started. One at a time.
    pub(crate) fn begin_training(&mut self) {
        self.training_in_flight = true;
    }

    /// Mark the training job as done.
    pub(crate) fn finish_training(&mut self) {
        self.training_in_flight = false;
    }

    /// Whether a training job is running.
    pub(crate) fn training_in_flight(&self) -> bool {
        self.training_in_flight
    }
}
