// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resolution of configured resource locations.
//!
//! A location is either a URL (`http://`, `https://`) or a local path. Local
//! paths may carry a `classpath:` or `file:` prefix; relative paths resolve
//! against the configured resource directory.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use url::Url;

const CLASSPATH_PREFIX: &str = "classpath:";
const FILE_PREFIX: &str = "file:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocation {
    Url(Url),
    File(PathBuf),
}

impl ResourceLocation {
    pub fn resolve(raw: &str, resource_dir: &Path) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            if let Ok(url) = Url::parse(raw) {
                return ResourceLocation::Url(url);
            }
        }
        ResourceLocation::File(resolve_path(raw, resource_dir))
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLocation::Url(url) => write!(f, "{url}"),
            ResourceLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolve a local resource path, stripping `classpath:`/`file:` prefixes.
pub fn resolve_path(raw: &str, resource_dir: &Path) -> PathBuf {
    let raw = raw.trim();
    let stripped = if let Some(rest) = raw.strip_prefix(CLASSPATH_PREFIX) {
        rest.trim_start_matches('/')
    } else if let Some(rest) = raw.strip_prefix(FILE_PREFIX) {
        rest
    } else {
        raw
    };

    let path = Path::new(stripped);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        resource_dir.join(path)
    }
}
