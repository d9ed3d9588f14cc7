// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;

use super::PipelineTopology;
use crate::core::Result;
use crate::core::config::MuxerConfig;
use crate::core::lifecycle::LifecycleSender;
use crate::core::links::{DynamicLinker, LinkAttacher};
use crate::core::probe::ProbeDispatcher;

/// Handles an engine receives when it starts streaming.
///
/// The engine owns the only lifecycle sender; dropping it without posting
/// end-of-stream reads as a disconnect on the controlling side.
#[derive(Debug)]
pub struct EngineContext {
    pub topology: Arc<PipelineTopology>,
    pub muxer: MuxerConfig,
    /// Completes the runtime edge as the demuxing stage announces outputs.
    pub linker: Arc<DynamicLinker>,
    /// Invoked once per batch at the topology's probe point.
    pub probe: Arc<ProbeDispatcher>,
    pub lifecycle: LifecycleSender,
}

/// The external media engine: decoding, batching, inference, rendering and
/// encoding all happen behind this seam.
pub trait MediaEngine: Send {
    fn name(&self) -> &str;

    /// Physically connects a producer to a downstream slot when the linker
    /// resolves an edge.
    fn attacher(&self) -> Arc<dyn LinkAttacher>;

    /// Begin streaming. Returns once the engine is running; progress is
    /// reported on the lifecycle channel.
    fn start(&mut self, ctx: EngineContext) -> Result<()>;

    /// Stop streaming and release resources. Safe to call more than once.
    fn stop(&mut self) -> Result<()>;
}
