// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crossbeam_channel::{Receiver, TryRecvError, never, select};

use super::{LifecycleEvent, LifecycleReceiver, StopSignal};

/// Why the lifecycle loop returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit {
    EndOfStream,
    /// Fatal pipeline error.
    Error(String),
    /// External stop request (user interrupt).
    Stopped,
    /// The producer went away without a terminal event.
    Disconnected,
}

impl LoopExit {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EndOfStream | Self::Stopped => 0,
            Self::Error(_) | Self::Disconnected => 1,
        }
    }
}

/// Wait for lifecycle events until a terminal one arrives or a stop is
/// requested.
///
/// Each event is logged and handed to `on_event` before the next wait.
/// Queued events always go before a stop request: a stop only wins when
/// nothing is pending, so a terminal event already posted is never lost.
/// Nothing queued after a terminal event is consumed.
pub fn run_lifecycle_loop<F>(
    events: &LifecycleReceiver,
    stop: &StopSignal,
    mut on_event: F,
) -> LoopExit
where
    F: FnMut(&LifecycleEvent),
{
    let events = events.inner();
    let mut stop_live = true;

    loop {
        match events.try_recv() {
            Ok(event) => {
                if let Some(exit) = deliver(event, &mut on_event) {
                    return exit;
                }
                continue;
            }
            Err(TryRecvError::Disconnected) => return disconnected(),
            Err(TryRecvError::Empty) => {}
        }

        let stop_rx: Receiver<()> = if stop_live {
            stop.inner().clone()
        } else {
            never()
        };
        select! {
            recv(events) -> msg => {
                let Ok(event) = msg else {
                    return disconnected();
                };
                if let Some(exit) = deliver(event, &mut on_event) {
                    return exit;
                }
            }
            recv(stop_rx) -> msg => {
                if msg.is_err() {
                    // Every stop handle is gone; nothing can request a stop anymore.
                    stop_live = false;
                    continue;
                }
                // An event may have landed while the stop was being picked.
                while let Ok(event) = events.try_recv() {
                    if let Some(exit) = deliver(event, &mut on_event) {
                        return exit;
                    }
                }
                tracing::info!("Stop requested, leaving lifecycle loop");
                return LoopExit::Stopped;
            }
        }
    }
}

/// Log and hand over one event; `Some` when it ends the loop.
fn deliver<F>(event: LifecycleEvent, on_event: &mut F) -> Option<LoopExit>
where
    F: FnMut(&LifecycleEvent),
{
    log_event(&event);
    on_event(&event);
    match event {
        LifecycleEvent::EndOfStream { .. } => Some(LoopExit::EndOfStream),
        LifecycleEvent::Error { message, .. } => Some(LoopExit::Error(message)),
        LifecycleEvent::StateChanged { .. } | LifecycleEvent::Warning { .. } => None,
    }
}

fn disconnected() -> LoopExit {
    tracing::warn!("Lifecycle producer disconnected without end-of-stream");
    LoopExit::Disconnected
}

fn log_event(event: &LifecycleEvent) {
    match event {
        LifecycleEvent::StateChanged { message, .. } => {
            tracing::debug!("Pipeline state changed: {}", message)
        }
        LifecycleEvent::Warning {
            message,
            debug: detail,
        } => {
            tracing::warn!("Warning: {}: {}", message, detail.as_deref().unwrap_or(""))
        }
        LifecycleEvent::Error {
            message,
            debug: detail,
        } => {
            tracing::error!("Error: {}: {}", message, detail.as_deref().unwrap_or(""))
        }
        LifecycleEvent::EndOfStream { message } => tracing::info!("{}", message),
    }
}
