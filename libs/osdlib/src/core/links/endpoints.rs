// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

/// Downstream input terminal, addressed as `element.pad`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputSlot {
    pub element: String,
    pub pad: String,
}

impl InputSlot {
    pub fn new(element: impl Into<String>, pad: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            pad: pad.into(),
        }
    }

    /// Parse `element.pad`; a bare name addresses the `sink` pad.
    pub fn parse(address: &str) -> Self {
        match address.split_once('.') {
            Some((element, pad)) => Self::new(element, pad),
            None => Self::new(address, "sink"),
        }
    }
}

impl std::fmt::Display for InputSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.element, self.pad)
    }
}

/// Opaque name of an upstream output that announced itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProducerHandle(pub String);

impl ProducerHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for ProducerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
