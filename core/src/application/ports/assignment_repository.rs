use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Assignment;
use crate::domain::value_objects::{OrganizationId, ProfileId, UserId};
use crate::error::AccessError;

/// Storage port for assignments.
///
/// The store must keep `(user_id, profile_id)` unique among active
/// assignments; `save` reports a violation as `DuplicateAssignment`. Note
/// that "active" here is the stored flag — expired-but-active rows are still
/// returned by the `find_active_*` queries, and callers apply
/// `Assignment::is_valid` themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn save(&self, assignment: &Assignment) -> Result<(), AccessError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>, AccessError>;
    async fn find_by_user_and_profile(
        &self,
        user_id: UserId,
        profile_id: ProfileId,
    ) -> Result<Option<Assignment>, AccessError>;
    async fn find_active_by_user_and_organization(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> Result<Vec<Assignment>, AccessError>;
    async fn find_active_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<Assignment>, AccessError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AccessError>;
}
