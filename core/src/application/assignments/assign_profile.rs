use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::info;

use crate::application::ports::{AssignmentRepository, ProfileRepository};
use crate::domain::entities::Assignment;
use crate::domain::value_objects::{OrganizationId, ProfileId, UserId};
use crate::error::AccessError;

pub struct AssignProfileCommand {
    pub user_id: UserId,
    pub profile_id: ProfileId,
    pub organization_id: OrganizationId,
    pub assigned_by: UserId,
    pub expires_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub extra_data: Option<Map<String, Value>>,
}

pub async fn execute<P, A>(
    profiles: &P,
    assignments: &A,
    cmd: AssignProfileCommand,
) -> Result<Assignment, AccessError>
where
    P: ProfileRepository + ?Sized,
    A: AssignmentRepository + ?Sized,
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
        return Err(AccessError::policy("Cannot assign an inactive profile"));
    }

    if let Some(existing) = assignments
        .find_by_user_and_profile(cmd.user_id, cmd.profile_id)
        .await?
    {
        if existing.is_active {
            return Err(AccessError::DuplicateAssignment {
                existing: existing.id,
            });
        }
    }

    let assignment = Assignment::create(
        cmd.user_id,
        cmd.profile_id,
        cmd.organization_id,
        cmd.assigned_by,
        cmd.expires_at,
        cmd.notes,
        cmd.extra_data,
    );

    let (ok, errors) = assignment.validate();
    if !ok {
        return Err(AccessError::Validation(errors));
    }
    assignments.save(&assignment).await?;

    info!(
        assignment_id = %assignment.id,
        user_id = %assignment.user_id,
        profile_id = %assignment.profile_id,
        temporary = assignment.is_temporary(),
        "profile assigned"
    );
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Profile;
    use crate::infrastructure::memory::{MemoryAssignmentRepository, MemoryProfileRepository};
    use chrono::Duration;

    async fn seeded_profile(profiles: &MemoryProfileRepository) -> Profile {
        let profile = Profile::create(
            "Team",
            "assignment target",
            OrganizationId::new(),
            UserId::new(),
            false,
            None,
        )
        .unwrap();
        profiles.save(&profile).await.unwrap();
        profile
    }

    fn command(profile: &Profile, user_id: UserId) -> AssignProfileCommand {
        AssignProfileCommand {
            user_id,
            profile_id: ProfileId::from_uuid(profile.id),
            organization_id: profile.organization_id,
            assigned_by: UserId::new(),
            expires_at: None,
            notes: None,
            extra_data: None,
        }
    }

    #[tokio::test]
    async fn test_assigns_and_rejects_duplicate() {
        let profiles = MemoryProfileRepository::new();
        let assignments = MemoryAssignmentRepository::new();
        let profile = seeded_profile(&profiles).await;
        let user = UserId::new();

        let first = execute(&profiles, &assignments, command(&profile, user))
            .await
            .unwrap();
        assert!(first.is_valid());

        let err = execute(&profiles, &assignments, command(&profile, user))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccessError::DuplicateAssignment { existing } if existing == first.id
        ));

        // A different user may hold the same profile
        execute(&profiles, &assignments, command(&profile, UserId::new()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_revoked_assignment_does_not_block_reassignment() {
        let profiles = MemoryProfileRepository::new();
        let assignments = MemoryAssignmentRepository::new();
        let profile = seeded_profile(&profiles).await;
        let user = UserId::new();

        let first = execute(&profiles, &assignments, command(&profile, user))
            .await
            .unwrap();
        assignments
            .save(&first.revoke(UserId::new(), Some("rotation")))
            .await
            .unwrap();

        execute(&profiles, &assignments, command(&profile, user))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejects_past_expiry() {
        let profiles = MemoryProfileRepository::new();
        let assignments = MemoryAssignmentRepository::new();
        let profile = seeded_profile(&profiles).await;

        let mut cmd = command(&profile, UserId::new());
        cmd.expires_at = Some(Utc::now() - Duration::days(1));
        let err = execute(&profiles, &assignments, cmd).await.unwrap_err();
        assert!(matches!(err, AccessError::Validation(_)));
    }

    #[tokio::test]
    async fn test_gates_inactive_profile_and_wrong_org() {
        let profiles = MemoryProfileRepository::new();
        let assignments = MemoryAssignmentRepository::new();
        let profile = seeded_profile(&profiles).await;

        let mut wrong_org = command(&profile, UserId::new());
        wrong_org.organization_id = OrganizationId::new();
        assert!(matches!(
            execute(&profiles, &assignments, wrong_org).await,
            Err(AccessError::PolicyViolation(_))
        ));

        profiles.save(&profile.deactivate().unwrap()).await.unwrap();
        assert!(matches!(
            execute(&profiles, &assignments, command(&profile, UserId::new())).await,
            Err(AccessError::PolicyViolation(_))
        ));
    }
}
