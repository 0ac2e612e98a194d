use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::ports::ProfileRepository;
use crate::domain::entities::Profile;
use crate::error::AccessError;

pub struct UpdateProfileCommand {
    pub profile_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub is_active: Option<bool>,
}

pub async fn execute<P: ProfileRepository + ?Sized>(
    profiles: &P,
    cmd: UpdateProfileCommand,
) -> Result<Profile, AccessError> {
    let profile = profiles
        .find_by_id(cmd.profile_id)
        .await?
        .ok_or_else(|| AccessError::not_found("profile", cmd.profile_id))?;

    // Content edits are gated; flipping the active flag is not, so an
    // inactive profile can still be reactivated here.
    let wants_content_change =
        cmd.name.is_some() || cmd.description.is_some() || cmd.metadata.is_some();
    if wants_content_change {
        let (ok, reason) = profile.can_be_modified();
        if !ok {
            warn!(profile_id = %profile.id, reason, "profile update blocked");
            return Err(AccessError::policy(reason));
        }
    }

    let mut updated = profile.clone();

    if let Some(name) = &cmd.name {
        let trimmed = name.trim();
        if trimmed != profile.name
            && profiles.exists_by_name(trimmed, profile.organization_id).await?
        {
            return Err(AccessError::DuplicateProfileName(trimmed.to_string()));
        }
        updated = updated.rename(name)?;
    }
    if let Some(description) = &cmd.description {
        updated = updated.redescribe(description)?;
    }
    if let Some(metadata) = cmd.metadata {
        updated = updated.merge_metadata(metadata);
    }
    if let Some(active) = cmd.is_active {
        updated = if active {
            updated.activate()
        } else {
            updated.deactivate()?
        };
    }

    let (ok, errors) = updated.validate();
    if !ok {
        return Err(AccessError::Validation(errors));
    }
    profiles.save(&updated).await?;

    info!(profile_id = %updated.id, "profile updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::profiles::create_profile::{self, CreateProfileCommand};
    use crate::domain::value_objects::{OrganizationId, UserId};
    use crate::infrastructure::memory::MemoryProfileRepository;

    async fn seeded(repo: &MemoryProfileRepository, name: &str, system: bool) -> Profile {
        create_profile::execute(
            repo,
            CreateProfileCommand {
                name: name.to_string(),
                description: "seed".to_string(),
                organization_id: OrganizationId::new(),
                created_by: UserId::new(),
                is_system_profile: system,
                metadata: None,
            },
        )
        .await
        .unwrap()
    }

    fn noop(profile_id: Uuid) -> UpdateProfileCommand {
        UpdateProfileCommand {
            profile_id,
            name: None,
            description: None,
            metadata: None,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_renames_and_persists() {
        let repo = MemoryProfileRepository::new();
        let profile = seeded(&repo, "Readers", false).await;

        let updated = execute(
            &repo,
            UpdateProfileCommand {
                name: Some("Editors".to_string()),
                ..noop(profile.id)
            },
        )
        .await
        .unwrap();

        assert_eq!("Editors", updated.name);
        assert_eq!(
            "Editors",
            repo.find_by_id(profile.id).await.unwrap().unwrap().name
        );
    }

    #[tokio::test]
    async fn test_system_profile_content_changes_are_blocked() {
        let repo = MemoryProfileRepository::new();
        let profile = seeded(&repo, "Admins", true).await;

        let err = execute(
            &repo,
            UpdateProfileCommand {
                description: Some("new".to_string()),
                ..noop(profile.id)
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccessError::PolicyViolation(_)));
    }

    #[tokio::test]
    async fn test_deactivate_then_reactivate() {
        let repo = MemoryProfileRepository::new();
        let profile = seeded(&repo, "Readers", false).await;

        let off = execute(
            &repo,
            UpdateProfileCommand {
                is_active: Some(false),
                ..noop(profile.id)
            },
        )
        .await
        .unwrap();
        assert!(!off.is_active);

        // Content edits on the inactive profile are rejected...
        let err = execute(
            &repo,
            UpdateProfileCommand {
                name: Some("Other".to_string()),
                ..noop(profile.id)
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccessError::PolicyViolation(_)));

        // ...but reactivation is allowed
        let on = execute(
            &repo,
            UpdateProfileCommand {
                is_active: Some(true),
                ..noop(profile.id)
            },
        )
        .await
        .unwrap();
        assert!(on.is_active);
    }

    #[tokio::test]
    async fn test_unknown_profile_is_not_found() {
        let repo = MemoryProfileRepository::new();
        let err = execute(&repo, noop(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, AccessError::NotFound { entity: "profile", .. }));
    }
}
