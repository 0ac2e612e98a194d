//! In-memory implementations of the storage ports.
//!
//! Process-local `Mutex<HashMap>` stores that honor the same uniqueness
//! constraints the design requires of a real database: one active grant per
//! `(profile_id, folder_path)` and one active assignment per
//! `(user_id, profile_id)`. Used by the command tests and suitable for
//! embedders that do not need persistence.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::{
    AssignmentRepository, FolderGrantRepository, ProfileRepository,
};
use crate::domain::entities::{Assignment, FolderGrant, Profile};
use crate::domain::value_objects::{FolderPath, OrganizationId, ProfileId, UserId};
use crate::error::AccessError;

fn lock_err() -> AccessError {
    AccessError::Storage("store lock poisoned".to_string())
}

#[derive(Default)]
pub struct MemoryProfileRepository {
    profiles: Mutex<HashMap<Uuid, Profile>>,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn save(&self, profile: &Profile) -> Result<(), AccessError> {
        let mut profiles = self.profiles.lock().map_err(|_| lock_err())?;
        let taken = profiles.values().any(|existing| {
            existing.id != profile.id
                && existing.organization_id == profile.organization_id
                && existing.name == profile.name
        });
        if taken {
            return Err(AccessError::DuplicateProfileName(profile.name.clone()));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, AccessError> {
        let profiles = self.profiles.lock().map_err(|_| lock_err())?;
        Ok(profiles.get(&id).cloned())
    }

    async fn exists_by_name(
        &self,
        name: &str,
        organization_id: OrganizationId,
    ) -> Result<bool, AccessError> {
        let profiles = self.profiles.lock().map_err(|_| lock_err())?;
        Ok(profiles
            .values()
            .any(|p| p.organization_id == organization_id && p.name == name))
    }

    async fn find_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Profile>, AccessError> {
        let profiles = self.profiles.lock().map_err(|_| lock_err())?;
        Ok(profiles
            .values()
            .filter(|p| p.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AccessError> {
        let mut profiles = self.profiles.lock().map_err(|_| lock_err())?;
        Ok(profiles.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryFolderGrantRepository {
    grants: Mutex<HashMap<Uuid, FolderGrant>>,
}

impl MemoryFolderGrantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FolderGrantRepository for MemoryFolderGrantRepository {
    async fn save(&self, grant: &FolderGrant) -> Result<(), AccessError> {
        let mut grants = self.grants.lock().map_err(|_| lock_err())?;
        if grant.is_active {
            let duplicate = grants.values().find(|existing| {
                existing.id != grant.id
                    && existing.is_active
                    && existing.profile_id == grant.profile_id
                    && existing.folder_path == grant.folder_path
            });
            if let Some(existing) = duplicate {
                return Err(AccessError::DuplicateGrant {
                    existing: existing.id,
                    folder_path: grant.folder_path.as_str().to_string(),
                });
            }
        }
        grants.insert(grant.id, grant.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FolderGrant>, AccessError> {
        let grants = self.grants.lock().map_err(|_| lock_err())?;
        Ok(grants.get(&id).cloned())
    }

    async fn find_active_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<FolderGrant>, AccessError> {
        let grants = self.grants.lock().map_err(|_| lock_err())?;
        Ok(grants
            .values()
            .filter(|g| g.profile_id == profile_id && g.is_active)
            .cloned()
            .collect())
    }

    async fn find_by_profile_and_folder(
        &self,
        profile_id: ProfileId,
        folder_path: &str,
    ) -> Result<Option<FolderGrant>, AccessError> {
        let grants = self.grants.lock().map_err(|_| lock_err())?;
        Ok(grants
            .values()
            .find(|g| g.profile_id == profile_id && g.folder_path.as_str() == folder_path)
            .cloned())
    }

    async fn find_conflicting(
        &self,
        profile_id: ProfileId,
        folder_path: &FolderPath,
    ) -> Result<Vec<FolderGrant>, AccessError> {
        let grants = self.grants.lock().map_err(|_| lock_err())?;
        Ok(grants
            .values()
            .filter(|g| {
                g.profile_id == profile_id
                    && g.is_active
                    && (g.folder_path == *folder_path
                        || g.folder_path.is_ancestor_of(folder_path)
                        || g.folder_path.is_descendant_of(folder_path))
            })
            .cloned()
            .collect())
    }

    async fn find_by_organization(
        &self,
        organization_id: OrganizationId,
        include_inactive: bool,
    ) -> Result<Vec<FolderGrant>, AccessError> {
        let grants = self.grants.lock().map_err(|_| lock_err())?;
        Ok(grants
            .values()
            .filter(|g| g.organization_id == organization_id)
            .filter(|g| include_inactive || g.is_active)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AccessError> {
        let mut grants = self.grants.lock().map_err(|_| lock_err())?;
        Ok(grants.remove(&id).is_some())
    }

    async fn delete_by_profile(&self, profile_id: ProfileId) -> Result<usize, AccessError> {
        let mut grants = self.grants.lock().map_err(|_| lock_err())?;
        let doomed: Vec<Uuid> = grants
            .values()
            .filter(|g| g.profile_id == profile_id)
            .map(|g| g.id)
            .collect();
        for id in &doomed {
            grants.remove(id);
        }
        Ok(doomed.len())
    }
}

#[derive(Default)]
pub struct MemoryAssignmentRepository {
    assignments: Mutex<HashMap<Uuid, Assignment>>,
}

impl MemoryAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentRepository for MemoryAssignmentRepository {
    async fn save(&self, assignment: &Assignment) -> Result<(), AccessError> {
        let mut assignments = self.assignments.lock().map_err(|_| lock_err())?;
        if assignment.is_active {
            let duplicate = assignments.values().find(|existing| {
                existing.id != assignment.id
                    && existing.is_active
                    && existing.user_id == assignment.user_id
                    && existing.profile_id == assignment.profile_id
            });
            if let Some(existing) = duplicate {
                return Err(AccessError::DuplicateAssignment {
                    existing: existing.id,
                });
            }
        }
        assignments.insert(assignment.id, assignment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>, AccessError> {
        let assignments = self.assignments.lock().map_err(|_| lock_err())?;
        Ok(assignments.get(&id).cloned())
    }

    async fn find_by_user_and_profile(
        &self,
        user_id: UserId,
        profile_id: ProfileId,
    ) -> Result<Option<Assignment>, AccessError> {
        let assignments = self.assignments.lock().map_err(|_| lock_err())?;
        Ok(assignments
            .values()
            .find(|a| a.user_id == user_id && a.profile_id == profile_id)
            .cloned())
    }

    async fn find_active_by_user_and_organization(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> Result<Vec<Assignment>, AccessError> {
        let assignments = self.assignments.lock().map_err(|_| lock_err())?;
        // Stored flag only; expiry filtering is the caller's job
        Ok(assignments
            .values()
            .filter(|a| {
                a.user_id == user_id && a.organization_id == organization_id && a.is_active
            })
            .cloned()
            .collect())
    }

    async fn find_active_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<Assignment>, AccessError> {
        let assignments = self.assignments.lock().map_err(|_| lock_err())?;
        Ok(assignments
            .values()
            .filter(|a| a.profile_id == profile_id && a.is_active)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AccessError> {
        let mut assignments = self.assignments.lock().map_err(|_| lock_err())?;
        Ok(assignments.remove(&id).is_some())
    }
}
