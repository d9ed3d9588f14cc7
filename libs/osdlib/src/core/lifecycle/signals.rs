// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Native signal handling for the lifecycle loop.
//!
//! Captures OS shutdown signals (SIGTERM, SIGINT) and turns them into a stop
//! request, so the lifecycle loop leaves at its next wait and the pipeline
//! tears down cleanly.

use std::sync::atomic::{AtomicBool, Ordering};

use super::StopHandle;

static SIGNAL_HANDLER_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Forward shutdown signals to `stop`.
///
/// # Platform Support
/// - Unix: SIGINT and SIGTERM via signal-hook, handled on a dedicated thread
/// - Others: Ctrl+C via the ctrlc crate
///
/// Installing twice is a no-op.
pub fn install_signal_handlers(stop: StopHandle) -> std::io::Result<()> {
    if SIGNAL_HANDLER_INSTALLED.swap(true, Ordering::SeqCst) {
        tracing::warn!("Signal handlers already installed, skipping");
        return Ok(());
    }

    #[cfg(unix)]
    {
        install_unix_signal_handlers(stop)?;
    }

    #[cfg(not(unix))]
    {
        install_ctrlc_handler(stop)?;
    }

    Ok(())
}

#[cfg(unix)]
fn install_unix_signal_handlers(stop: StopHandle) -> std::io::Result<()> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    // Detached: lives as long as the process.
    std::thread::Builder::new()
        .name("signal-handler".to_string())
        .spawn(move || {
            tracing::debug!("Signal handler thread started, waiting for signals");
            for signal in signals.forever() {
                tracing::info!("Received signal {}, requesting pipeline stop", signal);
                stop.stop();
            }
            tracing::debug!("Signal handler thread exiting");
        })?;

    tracing::info!("Native signal handlers installed (SIGTERM, SIGINT)");
    Ok(())
}

#[cfg(not(unix))]
fn install_ctrlc_handler(stop: StopHandle) -> std::io::Result<()> {
    ctrlc::set_handler(move || {
        tracing::info!("Ctrl+C received, requesting pipeline stop");
        stop.stop();
    })
    .map_err(std::io::Error::other)?;

    tracing::info!("Ctrl+C handler installed");
    Ok(())
}
