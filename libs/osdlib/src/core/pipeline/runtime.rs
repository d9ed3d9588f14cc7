// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;

use super::{EngineContext, MediaEngine, PipelineTopology};
use crate::core::annotate::Annotator;
use crate::core::config::OsdConfig;
use crate::core::error::{Result, StreamError};
use crate::core::lifecycle::{LoopExit, StopSignal, lifecycle_channel, run_lifecycle_loop};
use crate::core::links::{DynamicLinker, LinkAttacher};
use crate::core::probe::{ProbeDispatcher, ProbeRegistry, ProbeStats};

/// The annotation side of a stream session: the annotator installed at the
/// topology's probe point, the linker that completes the runtime edge, and
/// the lifecycle loop that decides when the session ends.
pub struct Pipeline {
    config: Arc<OsdConfig>,
    topology: Arc<PipelineTopology>,
    annotator: Arc<Annotator>,
    linker: Arc<DynamicLinker>,
    probes: ProbeRegistry,
}

impl Pipeline {
    pub fn new(
        config: Arc<OsdConfig>,
        topology: PipelineTopology,
        attacher: Arc<dyn LinkAttacher>,
    ) -> Result<Self> {
        config.validate()?;

        let upstream = topology.demuxer().ok_or_else(|| {
            StreamError::Configuration("Topology has no stage with runtime outputs".into())
        })?;
        let linker = Arc::new(DynamicLinker::new(upstream.name.clone(), attacher));
        linker.request_edge(
            topology.dynamic_slot.clone(),
            config.linker.expected_family.clone(),
        )?;

        let annotator = Arc::new(Annotator::new(Arc::clone(&config)));
        let probes = ProbeRegistry::new();
        probes.register(ProbeDispatcher::new(
            topology.probe_point,
            Arc::clone(&annotator) as _,
        ))?;

        tracing::info!("Pipeline: {}", topology.describe());
        Ok(Self {
            config,
            topology: Arc::new(topology),
            annotator,
            linker,
            probes,
        })
    }

    pub fn config(&self) -> &OsdConfig {
        &self.config
    }

    pub fn topology(&self) -> &PipelineTopology {
        &self.topology
    }

    pub fn annotator(&self) -> &Arc<Annotator> {
        &self.annotator
    }

    pub fn linker(&self) -> &Arc<DynamicLinker> {
        &self.linker
    }

    pub fn probe_stats(&self) -> Option<ProbeStats> {
        self.probes
            .get(self.topology.probe_point)
            .map(|dispatcher| dispatcher.stats())
    }

    /// Start `engine`, block on the lifecycle loop until end-of-stream, an
    /// error or a stop request, then stop the engine.
    ///
    /// Returns `Err` only when the engine fails to start.
    pub fn run(&self, engine: &mut dyn MediaEngine, stop: &StopSignal) -> Result<LoopExit> {
        let probe = self.probes.get(self.topology.probe_point).ok_or_else(|| {
            StreamError::Pipeline(format!("No probe at {}", self.topology.probe_point))
        })?;
        let (events_tx, events_rx) = lifecycle_channel();

        engine.start(EngineContext {
            topology: Arc::clone(&self.topology),
            muxer: self.config.muxer.clone(),
            linker: Arc::clone(&self.linker),
            probe,
            lifecycle: events_tx,
        })?;
        tracing::info!("[{}] running", engine.name());

        let exit = run_lifecycle_loop(&events_rx, stop, |_| {});

        if let Err(e) = engine.stop() {
            tracing::warn!("[{}] stop failed: {}", engine.name(), e);
        }
        if let Some(stats) = self.probe_stats() {
            tracing::info!(
                "[{}] {} batches annotated, {} dropped, {} handler errors, {} missing buffers",
                self.topology.probe_point,
                stats.dispatched,
                stats.dropped,
                stats.handler_errors,
                stats.missing_buffers
            );
        }
        tracing::info!("Pipeline finished: {:?}", exit);
        Ok(exit)
    }
}
