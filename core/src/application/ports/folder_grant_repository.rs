use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::FolderGrant;
use crate::domain::value_objects::{FolderPath, OrganizationId, ProfileId};
use crate::error::AccessError;

/// Storage port for folder grants.
///
/// The store must keep `(profile_id, folder_path)` unique among active
/// grants; `save` reports a violation as `DuplicateGrant` so concurrent
/// writers cannot race a duplicate past the command-level check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FolderGrantRepository: Send + Sync {
    async fn save(&self, grant: &FolderGrant) -> Result<(), AccessError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FolderGrant>, AccessError>;
    async fn find_active_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<FolderGrant>, AccessError>;
    async fn find_by_profile_and_folder(
        &self,
        profile_id: ProfileId,
        folder_path: &str,
    ) -> Result<Option<FolderGrant>, AccessError>;
    /// Active grants of the profile whose folder equals, contains, or is
    /// contained by the candidate path.
    async fn find_conflicting(
        &self,
        profile_id: ProfileId,
        folder_path: &FolderPath,
    ) -> Result<Vec<FolderGrant>, AccessError>;
    async fn find_by_organization(
        &self,
        organization_id: OrganizationId,
        include_inactive: bool,
    ) -> Result<Vec<FolderGrant>, AccessError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AccessError>;
    /// Cascade used when the owning profile is deleted; returns how many
    /// grants were removed.
    async fn delete_by_profile(&self, profile_id: ProfileId) -> Result<usize, AccessError>;
}
