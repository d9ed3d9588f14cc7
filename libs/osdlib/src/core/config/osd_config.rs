// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Typed configuration for the annotation core, loaded from TOML or YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::LabelSet;
use crate::core::frames::{BoxStyle, ClassId, FontParams, RgbaColor};
use crate::core::{Result, StreamError};

/// Summary overlay placement and the classes it reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Classes whose counts appear in the summary text, in display order.
    pub classes: Vec<ClassId>,
    pub x_offset: u32,
    pub y_offset: u32,
    pub font: FontParams,
    pub background_color: Option<RgbaColor>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            classes: vec![ClassId(0), ClassId(2)],
            x_offset: 10,
            y_offset: 12,
            font: FontParams::default(),
            background_color: Some(RgbaColor::BLACK),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassColor {
    pub id: ClassId,
    pub color: RgbaColor,
}

/// Per-object display styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStyleConfig {
    pub border_color: RgbaColor,
    pub border_width: u32,
    /// Overrides of `border_color` for specific classes.
    pub class_colors: Vec<ClassColor>,
    /// Emit a label overlay (`"<name> <object_id>"`) per detection.
    pub label_objects: bool,
}

impl Default for ObjectStyleConfig {
    fn default() -> Self {
        Self {
            border_color: RgbaColor::new(0.0, 0.0, 1.0, 0.8),
            border_width: 3,
            class_colors: Vec::new(),
            label_objects: false,
        }
    }
}

impl ObjectStyleConfig {
    /// Border style for a detection of `class_id`.
    pub fn style_for(&self, class_id: ClassId) -> BoxStyle {
        let border_color = self
            .class_colors
            .iter()
            .find(|c| c.id == class_id)
            .map(|c| c.color)
            .unwrap_or(self.border_color);
        BoxStyle {
            border_color,
            border_width: self.border_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    /// Media family (the part of the media type before `/`) the dynamic
    /// edge accepts.
    pub expected_family: String,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            expected_family: "video".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveSource {
    /// Live when the source is an RTSP stream.
    #[default]
    Auto,
    On,
    Off,
}

/// Batching muxer settings handed to the external engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuxerConfig {
    pub width: u32,
    pub height: u32,
    pub batch_size: u32,
    pub batched_push_timeout_us: u64,
    pub live_source: LiveSource,
}

impl Default for MuxerConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            batch_size: 1,
            batched_push_timeout_us: 40_000,
            live_source: LiveSource::Auto,
        }
    }
}

impl MuxerConfig {
    pub fn is_live(&self, source_is_live: bool) -> bool {
        match self.live_source {
            LiveSource::Auto => source_is_live,
            LiveSource::On => true,
            LiveSource::Off => false,
        }
    }
}

/// Everything the annotation core reads at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsdConfig {
    #[serde(default)]
    pub labels: LabelSet,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub objects: ObjectStyleConfig,
    #[serde(default)]
    pub linker: LinkerConfig,
    #[serde(default)]
    pub muxer: MuxerConfig,
}

impl OsdConfig {
    /// Load and validate a configuration file. `.yaml`/`.yml` files are read
    /// as YAML, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StreamError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .map_err(|e| match e {
            StreamError::Configuration(msg) => {
                StreamError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        tracing::info!("Loaded OSD config from {}", path.display());
        Ok(config)
    }

    /// Load a configuration file, returning defaults if it is missing or
    /// invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No OSD config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| StreamError::Configuration(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| StreamError::Configuration(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(StreamError::Configuration(
                "label set must not be empty".to_string(),
            ));
        }
        if let Some(id) = self.labels.first_duplicate() {
            return Err(StreamError::Configuration(format!(
                "class id {} appears more than once in the label set",
                id
            )));
        }
        if let Some(id) = self
            .summary
            .classes
            .iter()
            .find(|id| !self.labels.contains(**id))
        {
            return Err(StreamError::Configuration(format!(
                "summary class {} is not in the label set",
                id
            )));
        }
        if let Some(entry) = self
            .objects
            .class_colors
            .iter()
            .find(|entry| !self.labels.contains(entry.id))
        {
            return Err(StreamError::Configuration(format!(
                "class colour given for unconfigured class {}",
                entry.id
            )));
        }

        let colors = [
            ("summary.font.color", Some(self.summary.font.color)),
            ("summary.background_color", self.summary.background_color),
            ("objects.border_color", Some(self.objects.border_color)),
        ]
        .into_iter()
        .chain(
            self.objects
                .class_colors
                .iter()
                .map(|entry| ("objects.class_colors", Some(entry.color))),
        );
        for (field, color) in colors {
            if color.is_some_and(|c| !c.is_normalized()) {
                return Err(StreamError::Configuration(format!(
                    "{} components must lie in [0, 1]",
                    field
                )));
            }
        }

        if self.linker.expected_family.trim().is_empty() {
            return Err(StreamError::Configuration(
                "linker.expected_family must not be empty".to_string(),
            ));
        }
        if self.muxer.width == 0 || self.muxer.height == 0 || self.muxer.batch_size == 0 {
            return Err(StreamError::Configuration(
                "muxer width, height and batch_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = OsdConfig::default();
        config.validate().unwrap();
        assert_eq!(config.labels.len(), 4);
        assert_eq!(config.summary.classes, vec![ClassId(0), ClassId(2)]);
        assert_eq!(config.summary.font.name, "Serif");
        assert_eq!(config.muxer.batched_push_timeout_us, 40_000);
    }

    #[test]
    fn test_toml_partial_override() {
        let config = OsdConfig::from_toml_str(
            r#"
            labels = [
                { id = 0, name = "face" },
                { id = 1, name = "hand" },
            ]

            [summary]
            classes = [1]
            x_offset = 4

            [objects]
            border_color = [1.0, 0.0, 0.0, 1.0]
            class_colors = [{ id = 0, color = [0.0, 1.0, 0.0, 1.0] }]
            "#,
        )
        .unwrap();

        assert_eq!(config.labels.name(ClassId(0)), Some("face"));
        assert_eq!(config.summary.classes, vec![ClassId(1)]);
        assert_eq!(config.summary.x_offset, 4);
        assert_eq!(config.summary.y_offset, 12);
        assert_eq!(
            config.objects.style_for(ClassId(0)).border_color,
            RgbaColor::new(0.0, 1.0, 0.0, 1.0)
        );
        assert_eq!(
            config.objects.style_for(ClassId(1)).border_color,
            RgbaColor::new(1.0, 0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn test_rejects_unconfigured_summary_class() {
        let err = OsdConfig::from_toml_str("[summary]\nclasses = [7]\n").unwrap_err();
        assert!(matches!(err, StreamError::Configuration(_)));
    }

    #[test]
    fn test_rejects_out_of_range_color() {
        let err = OsdConfig::from_toml_str("[objects]\nborder_color = [2.0, 0.0, 0.0, 1.0]\n")
            .unwrap_err();
        assert!(err.to_string().contains("objects.border_color"));
    }

    #[test]
    fn test_load_yaml_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "linker:\n  expected_family: audio\nmuxer:\n  live_source: on").unwrap();

        let config = OsdConfig::load(file.path()).unwrap();
        assert_eq!(config.linker.expected_family, "audio");
        assert!(config.muxer.is_live(false));
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = OsdConfig::load_or_default(&dir.path().join("missing.toml"));
        assert_eq!(config, OsdConfig::default());
    }

    #[test]
    fn test_live_source_auto() {
        let muxer = MuxerConfig::default();
        assert!(muxer.is_live(true));
        assert!(!muxer.is_live(false));
    }
}
