use tracing::info;
use uuid::Uuid;

use crate::application::ports::FolderGrantRepository;
use crate::error::AccessError;

pub struct DeleteGrantCommand {
    pub grant_id: Uuid,
}

/// Hard removal. Deactivation is the soft alternative, handled by update.
pub async fn execute<G: FolderGrantRepository + ?Sized>(
    grants: &G,
    cmd: DeleteGrantCommand,
) -> Result<(), AccessError> {
    if !grants.delete(cmd.grant_id).await? {
        return Err(AccessError::not_found("grant", cmd.grant_id));
    }
    info!(grant_id = %cmd.grant_id, "folder grant deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FolderGrant;
    use crate::domain::value_objects::{OrganizationId, PermissionLevel, ProfileId, UserId};
    use crate::infrastructure::memory::MemoryFolderGrantRepository;

    #[tokio::test]
    async fn test_deletes_and_reports_missing() {
        let grants = MemoryFolderGrantRepository::new();
        let grant = FolderGrant::create(
            ProfileId::new(),
            "/documents/a",
            PermissionLevel::Read,
            OrganizationId::new(),
            UserId::new(),
            None,
            None,
        )
        .unwrap();
        grants.save(&grant).await.unwrap();

        execute(&grants, DeleteGrantCommand { grant_id: grant.id })
            .await
            .unwrap();

        let err = execute(&grants, DeleteGrantCommand { grant_id: grant.id })
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::NotFound { entity: "grant", .. }));
    }
}
