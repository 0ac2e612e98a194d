use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{FolderGrantRepository, ProfileRepository};
use crate::domain::value_objects::{FolderPath, OrganizationId, PermissionLevel, ProfileId};
use crate::error::AccessError;

/// Nesting beyond this depth draws a warning.
const DEEP_HIERARCHY_THRESHOLD: usize = 5;

pub struct ValidateGrantCommand {
    pub profile_id: ProfileId,
    pub folder_path: String,
    pub permission_level: PermissionLevel,
    pub organization_id: OrganizationId,
}

/// Dry-run result for a prospective grant. Errors would block creation;
/// warnings and recommendations are advisory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GrantValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub conflicts: Vec<Uuid>,
    pub recommendations: Vec<String>,
}

pub async fn execute<P, G>(
    profiles: &P,
    grants: &G,
    cmd: ValidateGrantCommand,
) -> Result<GrantValidationReport, AccessError>
where
    P: ProfileRepository + ?Sized,
    G: FolderGrantRepository + ?Sized,
{
    let mut report = GrantValidationReport::default();

    let profile = profiles.find_by_id(*cmd.profile_id.as_uuid()).await?;
    match &profile {
        None => {
            report.errors.push("Profile not found".to_string());
            return Ok(report);
        }
        Some(profile) => {
            if !profile.is_active {
                report.errors.push("Profile is not active".to_string());
            }
            if profile.organization_id != cmd.organization_id {
                report
                    .errors
                    .push("Profile does not belong to the specified organization".to_string());
            }
        }
    }

    let folder_path = match FolderPath::parse(&cmd.folder_path) {
        Ok(path) => path,
        Err(_) => {
            report
                .errors
                .push(format!("Invalid folder path format: {}", cmd.folder_path));
            return Ok(report);
        }
    };

    if let Some(existing) = grants
        .find_by_profile_and_folder(cmd.profile_id, folder_path.as_str())
        .await?
    {
        if existing.is_active {
            report
                .errors
                .push("Grant already exists for this profile and folder".to_string());
        }
    }

    let conflicting = grants
        .find_conflicting(cmd.profile_id, &folder_path)
        .await?;
    if !conflicting.is_empty() {
        report.conflicts = conflicting.iter().map(|c| c.id).collect();
        report.warnings.push(format!(
            "Found {} conflicting grant(s)",
            conflicting.len()
        ));

        // A covering ancestor at the same or a higher level makes the new
        // grant redundant rather than merely conflicting
        let redundant = conflicting.iter().any(|c| {
            c.folder_path.is_ancestor_of(&folder_path)
                && !c.permission_level.is_lower_than(&cmd.permission_level)
        });
        if redundant {
            report
                .recommendations
                .push("Consider using the covering parent folder grant instead".to_string());
        }
    }

    if folder_path.depth() > DEEP_HIERARCHY_THRESHOLD {
        report.warnings.push(format!(
            "Folder is very deep in the hierarchy (> {DEEP_HIERARCHY_THRESHOLD} levels)"
        ));
        report
            .recommendations
            .push("Consider flattening the folder structure".to_string());
    }

    if cmd.permission_level == PermissionLevel::Full {
        report
            .recommendations
            .push("Full access grants extensive capabilities, confirm it is necessary".to_string());
    }

    report.is_valid = report.errors.is_empty();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{FolderGrant, Profile};
    use crate::domain::value_objects::UserId;
    use crate::infrastructure::memory::{MemoryFolderGrantRepository, MemoryProfileRepository};

    async fn seeded() -> (MemoryProfileRepository, MemoryFolderGrantRepository, Profile) {
        let profiles = MemoryProfileRepository::new();
        let grants = MemoryFolderGrantRepository::new();
        let profile = Profile::create(
            "Team",
            "validation target",
            OrganizationId::new(),
            UserId::new(),
            false,
            None,
        )
        .unwrap();
        profiles.save(&profile).await.unwrap();
        (profiles, grants, profile)
    }

    fn command(profile: &Profile, path: &str, level: PermissionLevel) -> ValidateGrantCommand {
        ValidateGrantCommand {
            profile_id: ProfileId::from_uuid(profile.id),
            folder_path: path.to_string(),
            permission_level: level,
            organization_id: profile.organization_id,
        }
    }

    #[tokio::test]
    async fn test_clean_candidate_is_valid() {
        let (profiles, grants, profile) = seeded().await;
        let report = execute(
            &profiles,
            &grants,
            command(&profile, "/documents/clean", PermissionLevel::Read),
        )
        .await
        .unwrap();
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_reports_conflicts_and_redundancy() {
        let (profiles, grants, profile) = seeded().await;
        let parent = FolderGrant::create(
            ProfileId::from_uuid(profile.id),
            "/documents/a",
            PermissionLevel::Full,
            profile.organization_id,
            UserId::new(),
            None,
            None,
        )
        .unwrap();
        grants.save(&parent).await.unwrap();

        let report = execute(
            &profiles,
            &grants,
            command(&profile, "/documents/a/b", PermissionLevel::Read),
        )
        .await
        .unwrap();

        assert!(report.is_valid); // conflicts are warnings in the dry run
        assert_eq!(vec![parent.id], report.conflicts);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("parent folder grant")));
    }

    #[tokio::test]
    async fn test_flags_deep_paths_and_full_level() {
        let (profiles, grants, profile) = seeded().await;
        let report = execute(
            &profiles,
            &grants,
            command(
                &profile,
                "/documents/a/b/c/d/e/f",
                PermissionLevel::Full,
            ),
        )
        .await
        .unwrap();

        assert!(report.warnings.iter().any(|w| w.contains("deep")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Full access")));
    }

    #[tokio::test]
    async fn test_unknown_profile_short_circuits() {
        let (_, grants, profile) = seeded().await;
        let fresh_profiles = MemoryProfileRepository::new();
        let report = execute(
            &fresh_profiles,
            &grants,
            command(&profile, "/documents/a", PermissionLevel::Read),
        )
        .await
        .unwrap();
        assert!(!report.is_valid);
        assert_eq!(vec!["Profile not found".to_string()], report.errors);
    }
}
