use tracing::debug;

use crate::application::access::load_bindings;
use crate::application::ports::{AssignmentRepository, FolderGrantRepository, ProfileRepository};
use crate::domain::services::{AccessDecision, AccessResolver};
use crate::domain::value_objects::{OrganizationId, UserId};
use crate::error::AccessError;

pub struct CheckAccessQuery {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    pub folder_path: String,
    pub requested_action: Option<String>,
}

/// Point access check: may this user enter the folder, at what tier, and why.
pub async fn execute<A, P, G>(
    assignments: &A,
    profiles: &P,
    grants: &G,
    query: CheckAccessQuery,
) -> Result<AccessDecision, AccessError>
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

    let decision = AccessResolver::check_access(
        &bindings,
        &query.folder_path,
        query.requested_action.as_deref(),
    );

    debug!(
        user_id = %query.user_id,
        folder_path = %query.folder_path,
        can_access = decision.can_access,
        "access check resolved"
    );
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Assignment, FolderGrant, Profile};
    use crate::domain::value_objects::{PermissionLevel, ProfileId};
    use crate::infrastructure::memory::{
        MemoryAssignmentRepository, MemoryFolderGrantRepository, MemoryProfileRepository,
    };
    use chrono::{Duration, Utc};

    struct World {
        assignments: MemoryAssignmentRepository,
        profiles: MemoryProfileRepository,
        grants: MemoryFolderGrantRepository,
        user: UserId,
        org: OrganizationId,
    }

    /// User with one valid assignment to a profile holding FULL on
    /// /documents/projects and READ on /documents/hr.
    async fn world() -> World {
        let assignments = MemoryAssignmentRepository::new();
        let profiles = MemoryProfileRepository::new();
        let grants = MemoryFolderGrantRepository::new();
        let user = UserId::new();

        let profile = Profile::create(
            "Project Team",
            "projects full, hr read",
            OrganizationId::new(),
            UserId::new(),
            false,
            None,
        )
        .unwrap();
        let org = profile.organization_id;
        profiles.save(&profile).await.unwrap();

        let profile_id = ProfileId::from_uuid(profile.id);
        for (path, level) in [
            ("/documents/projects", PermissionLevel::Full),
            ("/documents/hr", PermissionLevel::Read),
        ] {
            let grant = FolderGrant::create(
                profile_id,
                path,
                level,
                org,
                UserId::new(),
                None,
                None,
            )
            .unwrap();
            grants.save(&grant).await.unwrap();
        }

        let assignment =
            Assignment::create(user, profile_id, org, UserId::new(), None, None, None);
        assignments.save(&assignment).await.unwrap();

        World {
            assignments,
            profiles,
            grants,
            user,
            org,
        }
    }

    fn query(w: &World, path: &str, action: Option<&str>) -> CheckAccessQuery {
        CheckAccessQuery {
            user_id: w.user,
            organization_id: w.org,
            folder_path: path.to_string(),
            requested_action: action.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_full_grant_covers_project_subtree() {
        let w = world().await;
        let decision = execute(
            &w.assignments,
            &w.profiles,
            &w.grants,
            query(&w, "/documents/projects/x", None),
        )
        .await
        .unwrap();

        assert!(decision.can_access);
        assert_eq!(Some(PermissionLevel::Full), decision.permission_level);
        assert!(decision
            .allowed_actions
            .contains(&"folder:create".to_string()));
    }

    #[tokio::test]
    async fn test_read_grant_cannot_update() {
        let w = world().await;
        let decision = execute(
            &w.assignments,
            &w.profiles,
            &w.grants,
            query(&w, "/documents/hr/payroll.pdf", Some("document:update")),
        )
        .await
        .unwrap();

        assert!(!decision.can_access);
        assert_eq!(Some(PermissionLevel::Read), decision.permission_level);
        assert!(decision.reason.contains("document:update"));
    }

    #[tokio::test]
    async fn test_ungranted_folder_is_denied() {
        let w = world().await;
        let decision = execute(
            &w.assignments,
            &w.profiles,
            &w.grants,
            query(&w, "/documents/finance", None),
        )
        .await
        .unwrap();

        assert!(!decision.can_access);
        assert!(decision.matching_grants.is_empty());
    }

    #[tokio::test]
    async fn test_expired_assignment_grants_nothing() {
        let w = world().await;
        let stored = w
            .assignments
            .find_active_by_user_and_organization(w.user, w.org)
            .await
            .unwrap()
            .remove(0);
        let mut stale = stored;
        stale.expires_at = Some(Utc::now() - Duration::hours(1));
        w.assignments.save(&stale).await.unwrap();

        let decision = execute(
            &w.assignments,
            &w.profiles,
            &w.grants,
            query(&w, "/documents/projects", None),
        )
        .await
        .unwrap();
        assert!(!decision.can_access);
    }

    #[tokio::test]
    async fn test_unknown_user_is_denied_without_error() {
        let w = world().await;
        let decision = execute(
            &w.assignments,
            &w.profiles,
            &w.grants,
            CheckAccessQuery {
                user_id: UserId::new(),
                organization_id: w.org,
                folder_path: "/documents/projects".to_string(),
                requested_action: None,
            },
        )
        .await
        .unwrap();
        assert!(!decision.can_access);
    }
}
