// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Wiring between the annotation core and the external media engine.

mod engine;
mod replay;
mod runtime;
mod source;
mod topology;

pub use engine::{EngineContext, MediaEngine};
pub use replay::ReplayEngine;
pub use runtime::Pipeline;
pub use source::SourceLocator;
pub use topology::{PipelineTopology, StageSpec};
