use tracing::{info, warn};
use uuid::Uuid;

use crate::application::ports::AssignmentRepository;
use crate::error::AccessError;

pub struct DeleteAssignmentCommand {
    pub assignment_id: Uuid,
}

/// Hard removal, allowed only for inactive assignments or active ones past
/// the retention window. Anything else must go through revocation so the
/// audit trail survives.
pub async fn execute<A: AssignmentRepository + ?Sized>(
    assignments: &A,
    cmd: DeleteAssignmentCommand,
) -> Result<(), AccessError> {
    let assignment = assignments
        .find_by_id(cmd.assignment_id)
        .await?
        .ok_or_else(|| AccessError::not_found("assignment", cmd.assignment_id))?;

    let (ok, reason) = assignment.can_be_deleted();
    if !ok {
        warn!(assignment_id = %assignment.id, reason, "assignment deletion blocked");
        return Err(AccessError::policy(reason));
    }

    assignments.delete(assignment.id).await?;
    info!(assignment_id = %assignment.id, "assignment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Assignment;
    use crate::domain::entities::assignment::ASSIGNMENT_DELETE_AGE_DAYS;
    use crate::domain::value_objects::{OrganizationId, ProfileId, UserId};
    use crate::infrastructure::memory::MemoryAssignmentRepository;
    use chrono::{Duration, Utc};

    fn assignment() -> Assignment {
        Assignment::create(
            UserId::new(),
            ProfileId::new(),
            OrganizationId::new(),
            UserId::new(),
            None,
            None,
            None,
        )
    }

    #[tokio::test]
    async fn test_recent_active_assignment_is_protected() {
        let assignments = MemoryAssignmentRepository::new();
        let fresh = assignment();
        assignments.save(&fresh).await.unwrap();

        let err = execute(
            &assignments,
            DeleteAssignmentCommand {
                assignment_id: fresh.id,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccessError::PolicyViolation(_)));

        // Deactivated, it becomes deletable
        assignments.save(&fresh.deactivate()).await.unwrap();
        execute(
            &assignments,
            DeleteAssignmentCommand {
                assignment_id: fresh.id,
            },
        )
        .await
        .unwrap();
        assert!(assignments.find_by_id(fresh.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_old_active_assignment_is_deletable() {
        let assignments = MemoryAssignmentRepository::new();
        let mut old = assignment();
        old.assigned_at = Utc::now() - Duration::days(ASSIGNMENT_DELETE_AGE_DAYS + 10);
        assignments.save(&old).await.unwrap();

        execute(
            &assignments,
            DeleteAssignmentCommand {
                assignment_id: old.id,
            },
        )
        .await
        .unwrap();
    }
}
