use crate::application::ports::{FolderGrantRepository, ProfileRepository};
use crate::domain::services::{AccessResolver, MatrixRow, PermissionMatrix};
use crate::domain::value_objects::{OrganizationId, ProfileId};
use crate::error::AccessError;

pub struct PermissionMatrixQuery {
    pub organization_id: OrganizationId,
    pub folder_paths: Option<Vec<String>>,
    pub profile_ids: Option<Vec<ProfileId>>,
    pub include_inactive: bool,
}

/// Folder × profile projection of an organization's grants.
pub async fn execute<P, G>(
    profiles: &P,
    grants: &G,
    query: PermissionMatrixQuery,
) -> Result<PermissionMatrix, AccessError>
where
    P: ProfileRepository + ?Sized,
    G: FolderGrantRepository + ?Sized,
{
    let org_grants = grants
        .find_by_organization(query.organization_id, query.include_inactive)
        .await?;

    let mut rows = Vec::with_capacity(org_grants.len());
    for grant in org_grants {
        let profile_name = match profiles.find_by_id(*grant.profile_id.as_uuid()).await? {
            Some(profile) => profile.name,
            None => format!("Profile-{}", grant.profile_id),
        };
        rows.push(MatrixRow {
            grant,
            profile_name,
        });
    }

    Ok(AccessResolver::build_matrix(
        &rows,
        query.folder_paths.as_deref(),
        query.profile_ids.as_deref(),
        query.include_inactive,
    ))
}
