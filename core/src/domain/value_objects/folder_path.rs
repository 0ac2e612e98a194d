use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AccessError;

/// Root prefix every grantable folder lives under.
pub const DOCUMENTS_ROOT: &str = "/documents";

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Validated folder path under [`DOCUMENTS_ROOT`].
///
/// Hierarchy queries are segment-based: `/documents/ab` is NOT a descendant
/// of `/documents/a`. Stored with any trailing separator stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderPath(String);

impl FolderPath {
    /// Validate and normalize a raw path.
    ///
    /// Rules: must start with `/documents/` (the bare root is accepted),
    /// none of `< > : " | ? *`, no leading/trailing whitespace, no doubled
    /// separators. Trailing separators are stripped before storing.
    pub fn parse(raw: &str) -> Result<Self, AccessError> {
        if raw != raw.trim() {
            return Err(AccessError::InvalidFolderPath(raw.to_string()));
        }
        if raw != DOCUMENTS_ROOT && !raw.starts_with("/documents/") {
            return Err(AccessError::InvalidFolderPath(raw.to_string()));
        }
        if raw.contains(INVALID_CHARS) {
            return Err(AccessError::InvalidFolderPath(raw.to_string()));
        }
        if raw.contains("//") {
            return Err(AccessError::InvalidFolderPath(raw.to_string()));
        }
        Ok(Self(raw.trim_end_matches('/').to_string()))
    }

    pub fn root() -> Self {
        Self(DOCUMENTS_ROOT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == DOCUMENTS_ROOT
    }

    /// Path relative to the root, empty for the root itself.
    pub fn relative_path(&self) -> &str {
        self.0
            .strip_prefix("/documents/")
            .unwrap_or("")
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        let relative = self.relative_path();
        if relative.is_empty() {
            0
        } else {
            relative.split('/').count()
        }
    }

    /// Last path segment; the root folder's name is `documents`.
    pub fn folder_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn parent(&self) -> Option<FolderPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rsplit_once('/') {
            Some(("", _)) | None => None,
            Some((parent, _)) => Some(Self(parent.to_string())),
        }
    }

    /// True when `path` names this folder or anything below it.
    ///
    /// The requested path may point at a document, not just a folder; only
    /// whole-segment prefixes match.
    pub fn covers(&self, path: &str) -> bool {
        let requested = path.trim_end_matches('/');
        requested == self.0 || requested.starts_with(&format!("{}/", self.0))
    }

    pub fn is_ancestor_of(&self, other: &FolderPath) -> bool {
        other.0.starts_with(&format!("{}/", self.0))
    }

    pub fn is_descendant_of(&self, other: &FolderPath) -> bool {
        other.is_ancestor_of(self)
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
