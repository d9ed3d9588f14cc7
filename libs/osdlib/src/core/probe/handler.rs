// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::Result;
use crate::core::frames::BatchMeta;

/// What happens to a buffer after a probe ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeReturn {
    /// Pass the buffer on, with whatever the handler changed.
    Continue,
    /// Remove the buffer from the flow.
    Drop,
}

/// Work invoked synchronously on every batch crossing a probe point.
///
/// Returning `Err` is the error disposition: the dispatcher logs it and
/// the buffer continues.
pub trait ProbeHandler: Send + Sync {
    fn name(&self) -> &str;

    fn on_batch(&self, batch: &mut BatchMeta) -> Result<ProbeReturn>;
}

/// Closure-backed handler, see [`probe_fn`].
pub struct FnProbeHandler<F> {
    name: String,
    f: F,
}

impl<F> ProbeHandler for FnProbeHandler<F>
where
    F: Fn(&mut BatchMeta) -> Result<ProbeReturn> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_batch(&self, batch: &mut BatchMeta) -> Result<ProbeReturn> {
        (self.f)(batch)
    }
}

/// Wrap a closure as a [`ProbeHandler`].
pub fn probe_fn<F>(name: impl Into<String>, f: F) -> FnProbeHandler<F>
where
    F: Fn(&mut BatchMeta) -> Result<ProbeReturn> + Send + Sync,
{
    FnProbeHandler {
        name: name.into(),
        f,
    }
}
