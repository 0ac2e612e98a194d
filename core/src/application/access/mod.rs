pub mod check_access;
pub mod permission_matrix;
pub mod user_context;

use crate::application::ports::{AssignmentRepository, FolderGrantRepository, ProfileRepository};
use crate::domain::services::ProfileBinding;
use crate::domain::value_objects::{OrganizationId, UserId};
use crate::error::AccessError;

/// Join a user's stored-active assignments with their profiles and active
/// grants. Validity (expiry, profile state) is NOT filtered here; the
/// resolver applies those predicates itself so the context query can also
/// report on stale bindings. Assignments whose profile no longer resolves
/// are skipped.
pub(crate) async fn load_bindings<A, P, G>(
    assignments: &A,
    profiles: &P,
    grants: &G,
    user_id: UserId,
    organization_id: OrganizationId,
) -> Result<Vec<ProfileBinding>, AccessError>
where
    A: AssignmentRepository + ?Sized,
    P: ProfileRepository + ?Sized,
    G: FolderGrantRepository + ?Sized,
{
    let active = assignments
        .find_active_by_user_and_organization(user_id, organization_id)
        .await?;

    let mut bindings = Vec::with_capacity(active.len());
    for assignment in active {
        let Some(profile) = profiles.find_by_id(*assignment.profile_id.as_uuid()).await? else {
            continue;
        };
        let profile_grants = grants.find_active_by_profile(assignment.profile_id).await?;
        bindings.push(ProfileBinding {
            assignment,
            profile,
            grants: profile_grants,
        });
    }
    Ok(bindings)
}
