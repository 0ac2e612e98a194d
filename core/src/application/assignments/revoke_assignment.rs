use tracing::info;
use uuid::Uuid;

use crate::application::ports::AssignmentRepository;
use crate::domain::entities::Assignment;
use crate::domain::value_objects::UserId;
use crate::error::AccessError;

pub struct RevokeAssignmentCommand {
    pub assignment_id: Uuid,
    pub revoked_by: UserId,
    pub reason: Option<String>,
}

pub async fn execute<A: AssignmentRepository + ?Sized>(
    assignments: &A,
    cmd: RevokeAssignmentCommand,
) -> Result<Assignment, AccessError> {
    let assignment = assignments
        .find_by_id(cmd.assignment_id)
        .await?
        .ok_or_else(|| AccessError::not_found("assignment", cmd.assignment_id))?;

    if !assignment.is_active {
        return Err(AccessError::policy(
            "Only active assignments can be revoked",
        ));
    }

    let revoked = assignment.revoke(cmd.revoked_by, cmd.reason.as_deref());
    assignments.save(&revoked).await?;

    info!(
        assignment_id = %revoked.id,
        revoked_by = %cmd.revoked_by,
        "assignment revoked"
    );
    Ok(revoked)
}
