// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

/// State of a dynamically resolved edge.
///
/// `AwaitingCapability -> Resolving -> Linked | LinkFailed`. `Linked` and
/// `LinkFailed` are terminal. An awaiting edge may also fail directly when
/// the upstream stage reports it has no more outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EdgeState {
    /// No matching capability announced yet.
    #[default]
    AwaitingCapability = 0,
    /// A matching announcement won the edge and is being attached.
    Resolving = 1,
    /// Producer attached to the input slot.
    Linked = 2,
    /// No compatible producer will ever be attached.
    LinkFailed = 3,
}

impl EdgeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Linked | Self::LinkFailed)
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::AwaitingCapability,
            1 => Self::Resolving,
            2 => Self::Linked,
            _ => Self::LinkFailed,
        }
    }
}

impl std::fmt::Display for EdgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingCapability => write!(f, "AwaitingCapability"),
            Self::Resolving => write!(f, "Resolving"),
            Self::Linked => write!(f, "Linked"),
            Self::LinkFailed => write!(f, "LinkFailed"),
        }
    }
}
