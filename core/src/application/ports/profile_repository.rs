use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Profile;
use crate::domain::value_objects::OrganizationId;
use crate::error::AccessError;

/// Storage port for profiles. Name uniqueness per organization is a storage
/// constraint; `save` reports a violation as `DuplicateProfileName`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn save(&self, profile: &Profile) -> Result<(), AccessError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, AccessError>;
    async fn exists_by_name(
        &self,
        name: &str,
        organization_id: OrganizationId,
    ) -> Result<bool, AccessError>;
    async fn find_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Profile>, AccessError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AccessError>;
}
