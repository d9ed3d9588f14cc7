// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Interception of buffers at designated points of the data flow.

mod dispatcher;
mod handler;
mod probe_point;
mod registry;

pub use dispatcher::{ProbeDispatcher, ProbeStats};
pub use handler::{FnProbeHandler, ProbeHandler, ProbeReturn, probe_fn};
pub use probe_point::ProbePoint;
pub use registry::ProbeRegistry;
