// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Null,
    Ready,
    Paused,
    Playing,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Ready => write!(f, "READY"),
            Self::Paused => write!(f, "PAUSED"),
            Self::Playing => write!(f, "PLAYING"),
        }
    }
}

/// Pipeline-wide signal posted by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    StateChanged {
        from: PipelineState,
        to: PipelineState,
        message: String,
    },
    Warning {
        message: String,
        debug: Option<String>,
    },
    /// Terminal.
    Error {
        message: String,
        debug: Option<String>,
    },
    /// Terminal.
    EndOfStream { message: String },
}

impl LifecycleEvent {
    pub fn state_changed(from: PipelineState, to: PipelineState) -> Self {
        Self::StateChanged {
            from,
            to,
            message: format!("{} -> {}", from, to),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
            debug: None,
        }
    }

    pub fn error(message: impl Into<String>, debug: Option<String>) -> Self {
        Self::Error {
            message: message.into(),
            debug,
        }
    }

    pub fn end_of_stream() -> Self {
        Self::EndOfStream {
            message: "End-of-stream".to_string(),
        }
    }

    /// `Error` and `EndOfStream` end the lifecycle loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error { .. } | Self::EndOfStream { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::StateChanged { message, .. }
            | Self::Warning { message, .. }
            | Self::Error { message, .. }
            | Self::EndOfStream { message } => message,
        }
    }
}
