// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Pipeline-wide lifecycle events and the loop that waits on them.

mod channel;
mod event;
mod run_loop;
mod signals;
mod stop;

pub use channel::{LifecycleReceiver, LifecycleSender, lifecycle_channel};
pub use event::{LifecycleEvent, PipelineState};
pub use run_loop::{LoopExit, run_lifecycle_loop};
pub use signals::install_signal_handlers;
pub use stop::{StopHandle, StopSignal, stop_signal};
