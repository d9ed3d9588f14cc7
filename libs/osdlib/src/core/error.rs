// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;

use crate::core::frames::ClassId;

#[derive(Error, Debug)]
pub enum StreamError {
    /// A probe point saw no buffer, or a buffer without batch metadata.
    #[error("Missing buffer at probe point {0}")]
    MissingBuffer(String),

    /// Detections carried class ids outside the configured label set.
    #[error("Unknown class id(s) [{}] in frame {frame_number}", join_class_ids(.class_ids))]
    UnknownClass {
        frame_number: u64,
        class_ids: Vec<ClassId>,
    },

    /// A matching capability arrived for an edge that is already linked.
    #[error("Input slot {slot} is already linked to {linked_to}; ignoring {announced}")]
    DuplicateLink {
        slot: String,
        linked_to: String,
        announced: String,
    },

    /// An edge never received a compatible announcement, or attaching it failed.
    #[error("Link to {slot} failed: {reason}")]
    LinkFailed { slot: String, reason: String },

    /// Terminal lifecycle error reported by the pipeline engine.
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StreamError {
    /// Per-frame and per-edge errors are handled locally and never stop the
    /// data path.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingBuffer(_)
                | Self::UnknownClass { .. }
                | Self::DuplicateLink { .. }
                | Self::LinkFailed { .. }
        )
    }
}

fn join_class_ids(ids: &[ClassId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, StreamError>;
