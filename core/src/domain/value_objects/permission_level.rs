use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AccessError;

/// Capability tier a profile holds on a folder.
///
/// Strictly ordered: Read < Edit < Full. Each tier maps to a fixed set of
/// `resource:verb` action tokens; the mapping is total and carries no state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Read,
    Edit,
    Full,
}

const READ_ACTIONS: &[&str] = &["document:read", "document:download", "rag:query", "ai:query"];

const EDIT_ACTIONS: &[&str] = &[
    "document:read",
    "document:download",
    "document:update",
    "document:share",
    "rag:query",
    "ai:query",
];

const FULL_ACTIONS: &[&str] = &[
    "document:read",
    "document:download",
    "document:create",
    "document:update",
    "document:delete",
    "document:share",
    "document:manage",
    "folder:create",
    "folder:update",
    "folder:delete",
    "rag:query",
    "rag:train",
    "ai:query",
    "ai:train",
];

impl PermissionLevel {
    pub fn all() -> [PermissionLevel; 3] {
        [Self::Read, Self::Edit, Self::Full]
    }

    pub fn default_level() -> Self {
        Self::Read
    }

    /// Ordinal used for comparison: Read = 1, Edit = 2, Full = 3.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Read => 1,
            Self::Edit => 2,
            Self::Full => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Edit => "Edit",
            Self::Full => "Full Access",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Read => "Read documents in the folder and query RAG over its content",
            Self::Edit => "Read and edit documents in the folder and query RAG",
            Self::Full => "Create folders, read, edit and delete documents, and train RAG",
        }
    }

    /// The fixed action-token set for this tier.
    pub fn allowed_actions(&self) -> &'static [&'static str] {
        match self {
            Self::Read => READ_ACTIONS,
            Self::Edit => EDIT_ACTIONS,
            Self::Full => FULL_ACTIONS,
        }
    }

    /// Exact token match, or a `resource:*` wildcard present in the allowed set.
    pub fn can_perform(&self, action: &str) -> bool {
        let allowed = self.allowed_actions();
        if allowed.contains(&action) {
            return true;
        }
        if let Some((resource, _)) = action.split_once(':') {
            let wildcard = format!("{resource}:*");
            return allowed.contains(&wildcard.as_str());
        }
        false
    }

    pub fn is_higher_than(&self, other: &PermissionLevel) -> bool {
        self.ordinal() > other.ordinal()
    }

    pub fn is_lower_than(&self, other: &PermissionLevel) -> bool {
        other.is_higher_than(self)
    }

    pub fn can_create_folders(&self) -> bool {
        matches!(self, Self::Full)
    }

    pub fn can_edit_documents(&self) -> bool {
        matches!(self, Self::Edit | Self::Full)
    }

    pub fn can_read_documents(&self) -> bool {
        true
    }

    pub fn can_use_rag(&self) -> bool {
        true
    }

    pub fn can_train_rag(&self) -> bool {
        matches!(self, Self::Full)
    }
}

impl FromStr for PermissionLevel {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "edit" => Ok(Self::Edit),
            "full" => Ok(Self::Full),
            other => Err(AccessError::InvalidPermissionLevel(other.to_string())),
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Read => "read",
            Self::Edit => "edit",
            Self::Full => "full",
        };
        write!(f, "{token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_strict_and_total() {
        let levels = PermissionLevel::all();
        for a in levels {
            for b in levels {
                let higher = a.is_higher_than(&b);
                let lower = a.is_lower_than(&b);
                let equal = a == b;
                // Exactly one relation holds for every pair
                assert_eq!(
                    1,
                    usize::from(higher) + usize::from(lower) + usize::from(equal),
                    "{a} vs {b}"
                );
            }
        }
        assert!(PermissionLevel::Full > PermissionLevel::Edit);
        assert!(PermissionLevel::Edit > PermissionLevel::Read);
    }

    #[test]
    fn test_action_table() {
        assert!(PermissionLevel::Full.can_perform("document:delete"));
        assert!(!PermissionLevel::Read.can_perform("document:delete"));
        assert!(PermissionLevel::Read.can_perform("rag:query"));
        assert!(PermissionLevel::Edit.can_perform("document:update"));
        assert!(!PermissionLevel::Edit.can_perform("folder:create"));
        assert!(!PermissionLevel::Read.can_perform("not-a-token"));
    }

    #[test]
    fn test_capability_predicates() {
        assert!(PermissionLevel::Full.can_create_folders());
        assert!(!PermissionLevel::Edit.can_create_folders());
        assert!(PermissionLevel::Edit.can_edit_documents());
        assert!(!PermissionLevel::Read.can_edit_documents());
        assert!(PermissionLevel::Read.can_use_rag());
        assert!(PermissionLevel::Full.can_train_rag());
        assert!(!PermissionLevel::Read.can_train_rag());
    }

    #[test]
    fn test_from_str_round_trip() {
        for level in PermissionLevel::all() {
            assert_eq!(level, level.to_string().parse().unwrap());
        }
        assert_eq!(PermissionLevel::Full, "FULL".parse().unwrap());
        assert!(matches!(
            "admin".parse::<PermissionLevel>(),
            Err(AccessError::InvalidPermissionLevel(_))
        ));
    }
}
