use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::value_objects::{OrganizationId, UserId};
use crate::error::AccessError;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '/', '\\'];

/// A named, organization-scoped bundle of folder grants.
///
/// Grants attach by foreign key; the profile itself knows nothing about them.
/// System profiles are immutable and undeletable. Name uniqueness per
/// organization is the owning repository's job, not this entity's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub organization_id: OrganizationId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_system_profile: bool,
    pub metadata: Map<String, Value>,
}

impl Profile {
    pub fn create(
        name: &str,
        description: &str,
        organization_id: OrganizationId,
        created_by: UserId,
        is_system_profile: bool,
        metadata: Option<Map<String, Value>>,
    ) -> Result<Self, AccessError> {
        let profile = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            organization_id,
            created_by,
            created_at: Utc::now(),
            updated_at: None,
            is_active: true,
            is_system_profile,
            metadata: metadata.unwrap_or_default(),
        };

        let (ok, errors) = profile.validate();
        if !ok {
            return Err(AccessError::Validation(errors));
        }
        Ok(profile)
    }

    pub fn rename(&self, name: &str) -> Result<Self, AccessError> {
        if self.is_system_profile {
            return Err(AccessError::policy("System profiles cannot be renamed"));
        }
        let renamed = Self {
            name: name.trim().to_string(),
            updated_at: Some(Utc::now()),
            ..self.clone()
        };
        if let Err(reason) = renamed.validate_name() {
            return Err(AccessError::Validation(vec![reason]));
        }
        Ok(renamed)
    }

    pub fn redescribe(&self, description: &str) -> Result<Self, AccessError> {
        if self.is_system_profile {
            return Err(AccessError::policy(
                "System profiles cannot have their description changed",
            ));
        }
        let redescribed = Self {
            description: description.trim().to_string(),
            updated_at: Some(Utc::now()),
            ..self.clone()
        };
        if let Err(reason) = redescribed.validate_description() {
            return Err(AccessError::Validation(vec![reason]));
        }
        Ok(redescribed)
    }

    /// Shallow union; incoming keys win.
    pub fn merge_metadata(&self, metadata: Map<String, Value>) -> Self {
        let mut merged = self.metadata.clone();
        merged.extend(metadata);
        Self {
            metadata: merged,
            updated_at: Some(Utc::now()),
            ..self.clone()
        }
    }

    pub fn deactivate(&self) -> Result<Self, AccessError> {
        if self.is_system_profile {
            return Err(AccessError::policy("System profiles cannot be deactivated"));
        }
        if !self.is_active {
            return Ok(self.clone());
        }
        Ok(Self {
            is_active: false,
            updated_at: Some(Utc::now()),
            ..self.clone()
        })
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

    pub fn can_be_modified(&self) -> (bool, &'static str) {
        if self.is_system_profile {
            return (false, "System profiles cannot be modified");
        }
        if !self.is_active {
            return (false, "Inactive profiles cannot be modified");
        }
        (true, "Profile can be modified")
    }

    pub fn can_be_deleted(&self) -> (bool, &'static str) {
        if self.is_system_profile {
            return (false, "System profiles cannot be deleted");
        }
        (true, "Profile can be deleted")
    }

    fn validate_name(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Profile name cannot be empty".to_string());
        }
        if self.name.trim().len() > MAX_NAME_LEN {
            return Err(format!("Profile name cannot exceed {MAX_NAME_LEN} characters"));
        }
        if self.name.contains(FORBIDDEN_NAME_CHARS) {
            return Err("Profile name contains forbidden characters".to_string());
        }
        Ok(())
    }

    fn validate_description(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Profile description cannot be empty".to_string());
        }
        if self.description.trim().len() > MAX_DESCRIPTION_LEN {
            return Err(format!(
                "Profile description cannot exceed {MAX_DESCRIPTION_LEN} characters"
            ));
        }
        Ok(())
    }

    pub fn validate(&self) -> (bool, Vec<String>) {
        let mut errors = Vec::new();

        if let Err(reason) = self.validate_name() {
            errors.push(reason);
        }
        if let Err(reason) = self.validate_description() {
            errors.push(reason);
        }
        if self.organization_id.as_uuid().is_nil() {
            errors.push("Organization ID is required".to_string());
        }
        if self.created_by.as_uuid().is_nil() {
            errors.push("Created by is required".to_string());
        }

        (errors.is_empty(), errors)
    }
}
