// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};
use std::time::Duration;

use super::{LifecycleEvent, PipelineState};

/// Create the lifecycle channel: one producer (the engine), one consumer
/// (the controlling loop). Delivery is ordered and exactly-once; the channel
/// is unbounded since lifecycle traffic is low-volume.
pub fn lifecycle_channel() -> (LifecycleSender, LifecycleReceiver) {
    let (tx, rx) = unbounded();
    (LifecycleSender { tx }, LifecycleReceiver { rx })
}

/// Producer side. Not `Clone`: the engine is the single producer.
#[derive(Debug)]
pub struct LifecycleSender {
    tx: Sender<LifecycleEvent>,
}

impl LifecycleSender {
    /// Post an event. Returns `false` once the consumer is gone.
    pub fn post(&self, event: LifecycleEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Lifecycle consumer gone, dropping {:?}", e.into_inner());
                false
            }
        }
    }

    pub fn state_changed(&self, from: PipelineState, to: PipelineState) -> bool {
        self.post(LifecycleEvent::state_changed(from, to))
    }

    pub fn warning(&self, message: impl Into<String>) -> bool {
        self.post(LifecycleEvent::warning(message))
    }

    pub fn error(&self, message: impl Into<String>, debug: Option<String>) -> bool {
        self.post(LifecycleEvent::error(message, debug))
    }

    pub fn end_of_stream(&self) -> bool {
        self.post(LifecycleEvent::end_of_stream())
    }
}

/// Consumer side.
#[derive(Debug)]
pub struct LifecycleReceiver {
    rx: Receiver<LifecycleEvent>,
}

impl LifecycleReceiver {
    /// Block for the next event; `None` once the producer is gone and the
    /// queue is drained.
    pub fn recv(&self) -> Option<LifecycleEvent> {
        self.rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<LifecycleEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Result<LifecycleEvent, TryRecvError> {
        self.rx.try_recv()
    }

    /// Events queued but not yet consumed.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    pub(crate) fn inner(&self) -> &Receiver<LifecycleEvent> {
        &self.rx
    }
}
