// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ClassId;

/// Per-class object counts for one frame.
///
/// Holds exactly one entry per configured class (zero when absent from the
/// frame). Detections whose class is not configured land in `other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    counts: BTreeMap<ClassId, usize>,
    other: usize,
}

impl ClassCounts {
    /// Zeroed counts for every class in `classes`.
    pub fn zeroed(classes: impl IntoIterator<Item = ClassId>) -> Self {
        Self {
            counts: classes.into_iter().map(|id| (id, 0)).collect(),
            other: 0,
        }
    }

    /// Count one detection. Returns `false` when the class is not configured
    /// and the detection went to the `other` bucket.
    pub fn record(&mut self, class_id: ClassId) -> bool {
        match self.counts.get_mut(&class_id) {
            Some(count) => {
                *count += 1;
                true
            }
            None => {
                self.other += 1;
                false
            }
        }
    }

    /// Count for a configured class; `None` if the class is not configured.
    pub fn get(&self, class_id: ClassId) -> Option<usize> {
        self.counts.get(&class_id).copied()
    }

    pub fn other(&self) -> usize {
        self.other
    }

    /// Configured classes plus the `other` bucket.
    pub fn total(&self) -> usize {
        self.counts.values().sum::<usize>() + self.other
    }

    /// Number of configured classes tracked.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, usize)> + '_ {
        self.counts.iter().map(|(id, count)| (*id, *count))
    }
}
