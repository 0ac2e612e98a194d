use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::application::ports::AssignmentRepository;
use crate::domain::entities::Assignment;
use crate::error::AccessError;

pub struct ExtendAssignmentCommand {
    pub assignment_id: Uuid,
    /// `None` removes the expiration, making the assignment permanent.
    pub new_expires_at: Option<DateTime<Utc>>,
}

pub async fn execute<A: AssignmentRepository + ?Sized>(
    assignments: &A,
    cmd: ExtendAssignmentCommand,
) -> Result<Assignment, AccessError> {
    let assignment = assignments
        .find_by_id(cmd.assignment_id)
        .await?
        .ok_or_else(|| AccessError::not_found("assignment", cmd.assignment_id))?;

    let (ok, reason) = assignment.can_be_modified();
    if !ok {
        return Err(AccessError::policy(reason));
    }

    let updated = match cmd.new_expires_at {
        Some(new_expires_at) => assignment.extend_expiration(new_expires_at)?,
        None => assignment.remove_expiration(),
    };
    assignments.save(&updated).await?;

    info!(
        assignment_id = %updated.id,
        permanent = updated.is_permanent(),
        "assignment expiration changed"
    );
    Ok(updated)
}
