use tracing::{info, warn};
use uuid::Uuid;

use crate::application::ports::{
    AssignmentRepository, FolderGrantRepository, ProfileRepository,
};
use crate::domain::value_objects::ProfileId;
use crate::error::AccessError;

pub struct DeleteProfileCommand {
    pub profile_id: Uuid,
}

/// Deleting a profile cascades to its grants. Blocked for system profiles
/// and for profiles that still carry active assignments.
pub async fn execute<P, G, A>(
    profiles: &P,
    grants: &G,
    assignments: &A,
    cmd: DeleteProfileCommand,
) -> Result<(), AccessError>
where
    P: ProfileRepository + ?Sized,
    G: FolderGrantRepository + ?Sized,
    A: AssignmentRepository + ?Sized,
{
    let profile = profiles
        .find_by_id(cmd.profile_id)
        .await?
        .ok_or_else(|| AccessError::not_found("profile", cmd.profile_id))?;

    let (ok, reason) = profile.can_be_deleted();
    if !ok {
        warn!(profile_id = %profile.id, reason, "profile deletion blocked");
        return Err(AccessError::policy(reason));
    }

    let profile_id = ProfileId::from_uuid(profile.id);
    let active_assignments = assignments.find_active_by_profile(profile_id).await?;
    if !active_assignments.is_empty() {
        return Err(AccessError::policy(format!(
            "Cannot delete profile with {} active assignment(s)",
            active_assignments.len()
        )));
    }

    let removed_grants = grants.delete_by_profile(profile_id).await?;
    profiles.delete(profile.id).await?;

    info!(
        profile_id = %profile.id,
        removed_grants,
        "profile deleted with its grants"
    );
    Ok(())
}
