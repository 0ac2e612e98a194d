use serde::Serialize;

use crate::application::access::load_bindings;
use crate::application::ports::{AssignmentRepository, FolderGrantRepository, ProfileRepository};
use crate::domain::entities::Assignment;
use crate::domain::services::{AccessResolver, UserAccessContext};
use crate::domain::value_objects::{OrganizationId, UserId};
use crate::error::AccessError;

pub struct UserContextQuery {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
}

/// Org-wide view of one user's access, plus consistency findings about the
/// underlying bindings (expired-but-active assignments, inactive profiles).
#[derive(Debug, Clone, Serialize)]
pub struct UserContext {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    pub active_assignments: Vec<Assignment>,
    #[serde(flatten)]
    pub access: UserAccessContext,
    pub is_consistent: bool,
    pub validation_errors: Vec<String>,
}

pub async fn execute<A, P, G>(
    assignments: &A,
    profiles: &P,
    grants: &G,
    query: UserContextQuery,
) -> Result<UserContext, AccessError>
where
    A: AssignmentRepository + ?Sized,
    P: ProfileRepository + ?Sized,
    G: FolderGrantRepository + ?Sized,
{
    let bindings = load_bindings(
        assignments,
        profiles,
        grants,
        query.user_id,
        query.organization_id,
    )
    .await?;

    let mut validation_errors = Vec::new();
    for binding in &bindings {
        if binding.assignment.is_expired() {
            validation_errors.push(format!(
                "Assignment {} is expired",
                binding.assignment.id
            ));
        }
        if !binding.profile.is_active {
            validation_errors.push(format!("Profile {} is inactive", binding.profile.id));
        }
    }

    let access = AccessResolver::build_user_context(&bindings);
    let active_assignments = bindings
        .into_iter()
        .map(|binding| binding.assignment)
        .collect();

    Ok(UserContext {
        user_id: query.user_id,
        organization_id: query.organization_id,
        active_assignments,
        access,
        is_consistent: validation_errors.is_empty(),
        validation_errors,
    })
}
