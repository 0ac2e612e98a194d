use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::value_objects::{
    FolderPath, OrganizationId, PermissionLevel, ProfileId, UserId,
};
use crate::error::AccessError;

/// A profile's permission level on one folder subtree.
///
/// Immutable record: every mutator returns a new value with `updated_at`
/// refreshed. Active grants on the same profile must not nest — overlap is
/// rejected at write time so resolution stays unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderGrant {
    pub id: Uuid,
    pub profile_id: ProfileId,
    pub folder_path: FolderPath,
    pub permission_level: PermissionLevel,
    pub organization_id: OrganizationId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub notes: Option<String>,
    /// Opaque metadata; the core never branches on its contents.
    pub extra_data: Map<String, Value>,
}

impl FolderGrant {
    pub fn create(
        profile_id: ProfileId,
        folder_path: &str,
        permission_level: PermissionLevel,
        organization_id: OrganizationId,
        created_by: UserId,
        notes: Option<String>,
        extra_data: Option<Map<String, Value>>,
    ) -> Result<Self, AccessError> {
        let folder_path = FolderPath::parse(folder_path)?;
        Ok(Self {
            id: Uuid::new_v4(),
            profile_id,
            folder_path,
            permission_level,
            organization_id,
            created_by,
            created_at: Utc::now(),
            updated_at: None,
            is_active: true,
            notes,
            extra_data: extra_data.unwrap_or_default(),
        })
    }

    pub fn with_permission_level(&self, permission_level: PermissionLevel) -> Self {
        Self {
            permission_level,
            updated_at: Some(Utc::now()),
            ..self.clone()
        }
    }

    pub fn with_folder_path(&self, folder_path: &str) -> Result<Self, AccessError> {
        let folder_path = FolderPath::parse(folder_path)?;
        Ok(Self {
            folder_path,
            updated_at: Some(Utc::now()),
            ..self.clone()
        })
    }

    pub fn with_notes(&self, notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            updated_at: Some(Utc::now()),
            ..self.clone()
        }
    }

    /// Shallow union; incoming keys win.
    pub fn merge_extra_data(&self, extra_data: Map<String, Value>) -> Self {
        let mut merged = self.extra_data.clone();
        merged.extend(extra_data);
        Self {
            extra_data: merged,
            updated_at: Some(Utc::now()),
            ..self.clone()
        }
    }

    pub fn deactivate(&self) -> Self {
        if !self.is_active {
            return self.clone();
        }
        Self {
            is_active: false,
            updated_at: Some(Utc::now()),
            ..self.clone()
        }
    }

    pub fn activate(&self) -> Self {
        if self.is_active {
            return self.clone();
        }
        Self {
            is_active: true,
            updated_at: Some(Utc::now()),
            ..self.clone()
        }
    }

    /// True when this grant lets its holder into `path`: the grant is active
    /// and its folder equals or is an ancestor of the requested path.
    pub fn can_access(&self, path: &str) -> bool {
        self.is_active && self.folder_path.covers(path)
    }

    /// Inactive grants permit nothing.
    pub fn allowed_actions(&self) -> &'static [&'static str] {
        if !self.is_active {
            return &[];
        }
        self.permission_level.allowed_actions()
    }

    pub fn can_perform_action(&self, action: &str) -> bool {
        self.is_active && self.permission_level.can_perform(action)
    }

    /// Two active grants on the same profile conflict when their folders are
    /// equal or nested, regardless of the levels involved.
    pub fn conflicts_with(&self, other: &FolderGrant) -> bool {
        if !self.is_active || !other.is_active {
            return false;
        }
        if self.profile_id != other.profile_id {
            return false;
        }
        self.folder_path == other.folder_path
            || self.folder_path.is_ancestor_of(&other.folder_path)
            || self.folder_path.is_descendant_of(&other.folder_path)
    }

    pub fn depth(&self) -> usize {
        self.folder_path.depth()
    }

    pub fn is_root_grant(&self) -> bool {
        self.folder_path.is_root()
    }

    pub fn parent_path(&self) -> Option<FolderPath> {
        self.folder_path.parent()
    }

    /// Defensive re-check of required identifiers and path format, usable on
    /// values loaded from storage as well as freshly built ones.
    pub fn validate(&self) -> (bool, Vec<String>) {
        let mut errors = Vec::new();

        if self.id.is_nil() {
            errors.push("Grant ID is required".to_string());
        }
        if self.profile_id.as_uuid().is_nil() {
            errors.push("Profile ID is required".to_string());
        }
        if self.organization_id.as_uuid().is_nil() {
            errors.push("Organization ID is required".to_string());
        }
        if self.created_by.as_uuid().is_nil() {
            errors.push("Created by is required".to_string());
        }
        if let Err(AccessError::InvalidFolderPath(path)) =
            FolderPath::parse(self.folder_path.as_str())
        {
            errors.push(format!("Invalid folder path format: {path}"));
        }

        (errors.is_empty(), errors)
    }
}
