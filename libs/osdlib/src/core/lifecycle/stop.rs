// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crossbeam_channel::{Receiver, Sender, bounded};

/// Create a stop request pair. The handle may be cloned into signal
/// handlers; the signal is watched by the lifecycle loop.
pub fn stop_signal() -> (StopHandle, StopSignal) {
    let (tx, rx) = bounded(1);
    (StopHandle { tx }, StopSignal { rx })
}

/// Requests the lifecycle loop to stop (user interrupt or equivalent).
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Sender<()>,
}

impl StopHandle {
    /// Request a stop. Repeated requests collapse into one.
    pub fn stop(&self) {
        let _ = self.tx.try_send(());
    }
}

#[derive(Debug)]
pub struct StopSignal {
    rx: Receiver<()>,
}

impl StopSignal {
    /// Whether a stop has been requested (and not yet consumed by the loop).
    pub fn is_requested(&self) -> bool {
        !self.rx.is_empty()
    }

    pub(crate) fn inner(&self) -> &Receiver<()> {
        &self.rx
    }
}
