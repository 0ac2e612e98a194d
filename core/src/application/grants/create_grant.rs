use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::application::ports::{FolderGrantRepository, ProfileRepository};
use crate::domain::entities::FolderGrant;
use crate::domain::value_objects::{OrganizationId, PermissionLevel, ProfileId, UserId};
use crate::error::AccessError;

pub struct CreateGrantCommand {
    pub profile_id: ProfileId,
    pub folder_path: String,
    pub permission_level: PermissionLevel,
    pub organization_id: OrganizationId,
    pub created_by: UserId,
    pub notes: Option<String>,
    pub extra_data: Option<Map<String, Value>>,
}

pub async fn execute<P, G>(
    profiles: &P,
    grants: &G,
    cmd: CreateGrantCommand,
) -> Result<FolderGrant, AccessError>
where
    P: ProfileRepository + ?Sized,
    G: FolderGrantRepository + ?Sized,
{
    let profile = profiles
        .find_by_id(*cmd.profile_id.as_uuid())
        .await?
        .ok_or_else(|| AccessError::not_found("profile", *cmd.profile_id.as_uuid()))?;

    if profile.organization_id != cmd.organization_id {
        return Err(AccessError::policy(
            "Profile must belong to the same organization",
        ));
    }
    if !profile.is_active {
        return Err(AccessError::policy(
            "Cannot create a grant for an inactive profile",
        ));
    }

    // Path validation and normalization happen in the entity factory
    let grant = FolderGrant::create(
        cmd.profile_id,
        &cmd.folder_path,
        cmd.permission_level,
        cmd.organization_id,
        cmd.created_by,
        cmd.notes,
        cmd.extra_data,
    )?;

    if let Some(existing) = grants
        .find_by_profile_and_folder(cmd.profile_id, grant.folder_path.as_str())
        .await?
    {
        if existing.is_active {
            return Err(AccessError::DuplicateGrant {
                existing: existing.id,
                folder_path: grant.folder_path.as_str().to_string(),
            });
        }
    }

    let conflicting = grants
        .find_conflicting(cmd.profile_id, &grant.folder_path)
        .await?;
    if !conflicting.is_empty() {
        warn!(
            profile_id = %cmd.profile_id,
            folder_path = %grant.folder_path,
            conflicts = conflicting.len(),
            "grant creation rejected, overlapping grants"
        );
        return Err(AccessError::GrantConflict {
            conflicting: conflicting.iter().map(|c| c.id).collect(),
        });
    }

    let (ok, errors) = grant.validate();
    if !ok {
        return Err(AccessError::Validation(errors));
    }
    grants.save(&grant).await?;

    info!(
        grant_id = %grant.id,
        profile_id = %grant.profile_id,
        folder_path = %grant.folder_path,
        level = %grant.permission_level,
        "folder grant created"
    );
    Ok(grant)
}
