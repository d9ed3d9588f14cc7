// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! osdlib - detection metadata annotation for video pipelines.
//!
//! The crate owns three pieces of a decode -> inference -> annotate -> render
//! pipeline:
//!
//! - the per-frame metadata model and the [`Annotator`] that turns detections
//!   into overlay content, invoked through a [`ProbeDispatcher`];
//! - the [`DynamicLinker`], which completes graph edges once a demuxer
//!   announces what it actually produces;
//! - the [`LifecycleChannel`](core::lifecycle) that carries pipeline-wide
//!   events to a single controlling loop.
//!
//! Decoding, inference, rendering and muxing are external engines reached
//! through the [`MediaEngine`] trait.

pub mod core;

pub use core::{
    annotate::{Annotator, ClassCounts},
    config::{LabelSet, OsdConfig},
    error::{Result, StreamError},
    frames::{
        BatchMeta, BoundingBox, BoxStyle, ClassId, DetectedObject, FrameMeta, MediaBuffer,
        OverlayContent, OverlayItem, OverlayOrigin, RgbaColor,
    },
    lifecycle::{
        LifecycleEvent, LifecycleReceiver, LifecycleSender, LoopExit, PipelineState, StopHandle,
        StopSignal, lifecycle_channel, run_lifecycle_loop, stop_signal,
    },
    links::{
        Capability, CapabilityAnnouncement, DynamicLinker, EdgeState, InputSlot, LinkAttacher,
        ProducerHandle,
    },
    pipeline::{
        EngineContext, MediaEngine, Pipeline, PipelineTopology, ReplayEngine, SourceLocator,
    },
    probe::{ProbeDispatcher, ProbeHandler, ProbePoint, ProbeReturn, ProbeStats},
};
