use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::application::ports::FolderGrantRepository;
use crate::domain::entities::FolderGrant;
use crate::domain::value_objects::PermissionLevel;
use crate::error::AccessError;

pub struct UpdateGrantCommand {
    pub grant_id: Uuid,
    pub permission_level: Option<PermissionLevel>,
    pub folder_path: Option<String>,
    pub notes: Option<String>,
    pub extra_data: Option<Map<String, Value>>,
    pub is_active: Option<bool>,
}

pub async fn execute<G: FolderGrantRepository + ?Sized>(
    grants: &G,
    cmd: UpdateGrantCommand,
) -> Result<FolderGrant, AccessError> {
    let grant = grants
        .find_by_id(cmd.grant_id)
        .await?
        .ok_or_else(|| AccessError::not_found("grant", cmd.grant_id))?;

    let mut updated = grant.clone();

    if let Some(level) = cmd.permission_level {
        updated = updated.with_permission_level(level);
    }

    if let Some(path) = &cmd.folder_path {
        let moved = updated.with_folder_path(path)?;
        if moved.folder_path != grant.folder_path {
            if let Some(existing) = grants
                .find_by_profile_and_folder(grant.profile_id, moved.folder_path.as_str())
                .await?
            {
                if existing.is_active && existing.id != grant.id {
                    return Err(AccessError::DuplicateGrant {
                        existing: existing.id,
                        folder_path: moved.folder_path.as_str().to_string(),
                    });
                }
            }
            let conflicting: Vec<Uuid> = grants
                .find_conflicting(grant.profile_id, &moved.folder_path)
                .await?
                .into_iter()
                .filter(|c| c.id != grant.id)
                .map(|c| c.id)
                .collect();
            if !conflicting.is_empty() {
                return Err(AccessError::GrantConflict { conflicting });
            }
        }
        updated = moved;
    }

    if let Some(notes) = cmd.notes {
        updated = updated.with_notes(notes);
    }
    if let Some(extra_data) = cmd.extra_data {
        updated = updated.merge_extra_data(extra_data);
    }
    if let Some(active) = cmd.is_active {
        updated = if active {
            updated.activate()
        } else {
            updated.deactivate()
        };
    }

    let (ok, errors) = updated.validate();
    if !ok {
        return Err(AccessError::Validation(errors));
    }
    grants.save(&updated).await?;

    info!(grant_id = %updated.id, "folder grant updated");
    Ok(updated)
}
