use tracing::{info, warn};
use uuid::Uuid;

use crate::application::ports::AssignmentRepository;
use crate::domain::entities::Assignment;
use crate::domain::value_objects::UserId;
use crate::error::AccessError;

pub struct ReactivateAssignmentCommand {
    pub assignment_id: Uuid,
    pub reactivated_by: UserId,
}

pub async fn execute<A: AssignmentRepository + ?Sized>(
    assignments: &A,
    cmd: ReactivateAssignmentCommand,
) -> Result<Assignment, AccessError> {
    let assignment = assignments
        .find_by_id(cmd.assignment_id)
        .await?
        .ok_or_else(|| AccessError::not_found("assignment", cmd.assignment_id))?;

    if assignment.is_active {
        warn!(assignment_id = %assignment.id, "reactivate called on an active assignment");
        return Ok(assignment);
    }

    let reactivated = assignment.reactivate(cmd.reactivated_by);
    assignments.save(&reactivated).await?;

    info!(
        assignment_id = %reactivated.id,
        reactivated_by = %cmd.reactivated_by,
        "assignment reactivated"
    );
    Ok(reactivated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{OrganizationId, ProfileId};
    use crate::infrastructure::memory::MemoryAssignmentRepository;

    #[tokio::test]
    async fn test_reactivates_revoked_assignment() {
        let assignments = MemoryAssignmentRepository::new();
        let assignment = Assignment::create(
            UserId::new(),
            ProfileId::new(),
            OrganizationId::new(),
            UserId::new(),
            None,
            None,
            None,
        )
        .revoke(UserId::new(), Some("offboarding"));
        assignments.save(&assignment).await.unwrap();

        let actor = UserId::new();
        let reactivated = execute(
            &assignments,
            ReactivateAssignmentCommand {
                assignment_id: assignment.id,
                reactivated_by: actor,
            },
        )
        .await
        .unwrap();

        assert!(reactivated.is_active);
        assert!(reactivated.revoked_at.is_none());
        assert_eq!(actor, reactivated.assigned_by);

        // Reactivating an active assignment is a warned no-op
        let again = execute(
            &assignments,
            ReactivateAssignmentCommand {
                assignment_id: assignment.id,
                reactivated_by: UserId::new(),
            },
        )
        .await
        .unwrap();
        assert_eq!(actor, again.assigned_by);
    }
}
