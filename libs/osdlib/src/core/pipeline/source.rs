// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::path::{Path, PathBuf};

/// Where the stream comes from: a container file or a URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    /// Local container file, demuxed explicitly.
    File(PathBuf),
    /// Anything with a scheme (`file://`, `rtsp://`, `http://`, ...), handed
    /// to a decoding bin.
    Uri(String),
}

impl SourceLocator {
    pub fn parse(locator: &str) -> Self {
        if locator.contains("://") {
            Self::Uri(locator.to_string())
        } else {
            Self::File(PathBuf::from(locator))
        }
    }

    fn scheme(&self) -> Option<&str> {
        match self {
            Self::File(_) => None,
            Self::Uri(uri) => uri.split_once("://").map(|(scheme, _)| scheme),
        }
    }

    /// RTSP sources are live; the muxer should not wait on them.
    pub fn is_live(&self) -> bool {
        self.scheme()
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("rtsp"))
    }

    /// Local path for files and `file://` URIs.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Uri(uri) => uri
                .strip_prefix("file://")
                .map(Path::new),
        }
    }
}

impl std::fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Uri(uri) => f.write_str(uri),
        }
    }
}
