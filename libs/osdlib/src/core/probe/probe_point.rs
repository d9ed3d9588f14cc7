// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

/// Where in the data flow a probe intercepts buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbePoint {
    /// Output of the inference stage, before conversion and rendering.
    InferenceOutput,
    /// Input of the overlay renderer.
    RenderInput,
}

impl std::fmt::Display for ProbePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InferenceOutput => write!(f, "inference-output"),
            Self::RenderInput => write!(f, "render-input"),
        }
    }
}
