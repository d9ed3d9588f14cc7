// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use super::ProducerHandle;
use crate::core::{Result, StreamError};

/// Negotiated media capability of an upstream output.
///
/// Parsed from strings such as
/// `video/x-raw(memory:NVMM), format=(string)NV12, width=(int)1920`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    media_type: String,
    /// Memory/feature qualifiers in parentheses after the media type.
    features: Option<String>,
    params: Vec<(String, String)>,
}

impl Capability {
    pub fn parse(caps: &str) -> Result<Self> {
        let mut fields = split_top_level(caps.trim());
        let head = fields.next().map(str::trim).unwrap_or_default();
        if head.is_empty() {
            return Err(StreamError::Configuration(format!(
                "empty capability string '{}'",
                caps
            )));
        }

        let (media_type, features) = match head.split_once('(') {
            Some((media, rest)) => (
                media.trim(),
                Some(rest.trim_end_matches(')').trim().to_string()),
            ),
            None => (head, None),
        };

        let params = fields
            .filter_map(|field| {
                let (key, value) = field.split_once('=')?;
                Some((key.trim().to_string(), strip_type_hint(value.trim()).to_string()))
            })
            .collect();

        Ok(Self {
            media_type: media_type.to_string(),
            features,
            params,
        })
    }

    /// Full media type, e.g. `video/x-h264`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Part of the media type before `/`, e.g. `video`.
    pub fn family(&self) -> &str {
        self.media_type
            .split_once('/')
            .map(|(family, _)| family)
            .unwrap_or(&self.media_type)
    }

    pub fn matches_family(&self, family: &str) -> bool {
        self.family().eq_ignore_ascii_case(family)
    }

    pub fn features(&self) -> Option<&str> {
        self.features.as_deref()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.media_type)?;
        if let Some(features) = &self.features {
            write!(f, "({})", features)?;
        }
        for (key, value) in &self.params {
            write!(f, ", {}={}", key, value)?;
        }
        Ok(())
    }
}

/// Split on commas outside `()`, `{}` and `[]` groups and quoted strings.
fn split_top_level(s: &str) -> impl Iterator<Item = &str> {
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0usize;
    let mut parts = Vec::new();
    for (i, ch) in s.char_indices() {
        if in_quotes {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts.into_iter()
}

/// `(int)1920` -> `1920`
fn strip_type_hint(value: &str) -> &str {
    if value.starts_with('(') {
        if let Some((_, rest)) = value.split_once(')') {
            return rest.trim();
        }
    }
    value
}

/// A newly created upstream output and the capability it negotiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityAnnouncement {
    pub producer: ProducerHandle,
    pub caps: String,
}

impl CapabilityAnnouncement {
    pub fn new(producer: impl Into<String>, caps: impl Into<String>) -> Self {
        Self {
            producer: ProducerHandle::new(producer),
            caps: caps.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let caps = Capability::parse("video/x-h264, stream-format=avc, width=1920").unwrap();
        assert_eq!(caps.media_type(), "video/x-h264");
        assert_eq!(caps.family(), "video");
        assert_eq!(caps.param("stream-format"), Some("avc"));
        assert_eq!(caps.param("width"), Some("1920"));
        assert!(caps.features().is_none());
    }

    #[test]
    fn test_parse_features_and_type_hints() {
        let caps =
            Capability::parse("video/x-raw(memory:NVMM), format=(string)NV12, width=(int)1280")
                .unwrap();
        assert_eq!(caps.media_type(), "video/x-raw");
        assert_eq!(caps.features(), Some("memory:NVMM"));
        assert_eq!(caps.param("format"), Some("NV12"));
        assert_eq!(caps.param("width"), Some("1280"));
    }

    #[test]
    fn test_family_matching() {
        let audio = Capability::parse("audio/mpeg, mpegversion=4").unwrap();
        assert!(audio.matches_family("audio"));
        assert!(!audio.matches_family("video"));
        assert!(Capability::parse("   ").is_err());
    }

    #[test]
    fn test_list_and_quoted_values_stay_whole() {
        let caps = Capability::parse(
            r#"video/x-raw, format=(string){ NV12, I420 }, framerate=(fraction)[ 0/1, 2147483647/1 ], title=(string)"a, b", width=(int)640"#,
        )
        .unwrap();
        assert_eq!(caps.param("format"), Some("{ NV12, I420 }"));
        assert_eq!(caps.param("framerate"), Some("[ 0/1, 2147483647/1 ]"));
        assert_eq!(caps.param("title"), Some(r#""a, b""#));
        assert_eq!(caps.param("width"), Some("640"));
        assert_eq!(caps.params().count(), 4);
    }

    #[test]
    fn test_display() {
        let caps = Capability::parse("video/x-raw(memory:NVMM), format=NV12").unwrap();
        assert_eq!(caps.to_string(), "video/x-raw(memory:NVMM), format=NV12");
    }
}
