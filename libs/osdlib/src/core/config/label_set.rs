// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use crate::core::frames::ClassId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: ClassId,
    pub name: String,
}

/// The pipeline's class-label set, in configuration order.
///
/// Built once before the pipeline starts and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    pub fn new(labels: impl IntoIterator<Item = (u32, &'static str)>) -> Self {
        Self {
            labels: labels
                .into_iter()
                .map(|(id, name)| Label {
                    id: ClassId(id),
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    /// The four-class detector label set: vehicle, bicycle, person, roadsign.
    pub fn traffic() -> Self {
        Self::new([(0, "vehicle"), (1, "bicycle"), (2, "person"), (3, "roadsign")])
    }

    pub fn name(&self, id: ClassId) -> Option<&str> {
        self.labels
            .iter()
            .find(|label| label.id == id)
            .map(|label| label.name.as_str())
    }

    pub fn contains(&self, id: ClassId) -> bool {
        self.labels.iter().any(|label| label.id == id)
    }

    pub fn id_of(&self, name: &str) -> Option<ClassId> {
        self.labels
            .iter()
            .find(|label| label.name.eq_ignore_ascii_case(name))
            .map(|label| label.id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.labels.iter().map(|label| label.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// First id that appears more than once, if any.
    pub fn first_duplicate(&self) -> Option<ClassId> {
        self.labels.iter().enumerate().find_map(|(i, label)| {
            self.labels[..i]
                .iter()
                .any(|earlier| earlier.id == label.id)
                .then_some(label.id)
        })
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::traffic()
    }
}
