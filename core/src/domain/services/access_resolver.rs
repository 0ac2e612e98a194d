use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::domain::entities::{Assignment, FolderGrant, Profile};
use crate::domain::value_objects::{PermissionLevel, ProfileId};

/// One of a user's assignments joined with its profile and that profile's
/// grants, as loaded from storage. The resolver re-applies the validity
/// predicates itself rather than trusting the loader.
#[derive(Debug, Clone)]
pub struct ProfileBinding {
    pub assignment: Assignment,
    pub profile: Profile,
    pub grants: Vec<FolderGrant>,
}

/// Outcome of a point access check for one folder path.
#[derive(Debug, Clone, Serialize)]
pub struct AccessDecision {
    pub can_access: bool,
    pub permission_level: Option<PermissionLevel>,
    pub allowed_actions: Vec<String>,
    pub reason: String,
    /// Names of every profile that reached the folder, first-seen order.
    pub matching_profiles: Vec<String>,
    /// Ids of every grant that reached the folder, first-seen order.
    pub matching_grants: Vec<Uuid>,
}

/// Org-wide inventory of what a user holds: every action any grant allows,
/// every folder with a direct grant, and the strongest level per folder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserAccessContext {
    pub effective_permissions: BTreeSet<String>,
    pub accessible_folders: BTreeSet<String>,
    pub folder_levels: BTreeMap<String, PermissionLevel>,
}

/// One row of input to [`AccessResolver::build_matrix`].
#[derive(Debug, Clone)]
pub struct MatrixRow {
    pub grant: FolderGrant,
    pub profile_name: String,
}

/// Folder × profile projection of an organization's grants.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PermissionMatrix {
    pub matrix: BTreeMap<String, BTreeMap<String, String>>,
    pub folder_paths: Vec<String>,
    pub profile_names: Vec<String>,
    pub level_counts: BTreeMap<String, usize>,
}

/// Stateless access-resolution algorithms.
///
/// Point check and context aggregation deliberately differ: the point check
/// reports the single strongest matching grant's action set and covers
/// descendants of granted folders, while the context unions actions across
/// all grants and lists only folders with a direct grant.
pub struct AccessResolver;

impl AccessResolver {
    /// Decide whether the user may enter `folder_path`, and at what tier.
    ///
    /// Highest permission level wins; on a tie the first grant observed at
    /// the top stays the winner. All matching profiles and grants are
    /// surfaced for traceability regardless of which one wins. When
    /// `requested_action` is given and the winning tier cannot perform it,
    /// the decision flips to denied while the matched tier stays reported.
    pub fn check_access(
        bindings: &[ProfileBinding],
        folder_path: &str,
        requested_action: Option<&str>,
    ) -> AccessDecision {
        let mut winner: Option<(&FolderGrant, &Profile)> = None;
        let mut matching_profiles: Vec<String> = Vec::new();
        let mut matching_grants: Vec<Uuid> = Vec::new();

        for binding in bindings {
            if !binding.assignment.is_valid() || !binding.profile.is_active {
                continue;
            }
            for grant in &binding.grants {
                if !grant.can_access(folder_path) {
                    continue;
                }
                if !matching_profiles.contains(&binding.profile.name) {
                    matching_profiles.push(binding.profile.name.clone());
                }
                if !matching_grants.contains(&grant.id) {
                    matching_grants.push(grant.id);
                }
                let replaces = match winner {
                    None => true,
                    Some((best, _)) => grant
                        .permission_level
                        .is_higher_than(&best.permission_level),
                };
                if replaces {
                    winner = Some((grant, &binding.profile));
                }
            }
        }

        let Some((grant, profile)) = winner else {
            return AccessDecision {
                can_access: false,
                permission_level: None,
                allowed_actions: Vec::new(),
                reason: format!("No grant covers folder '{folder_path}'"),
                matching_profiles,
                matching_grants,
            };
        };

        let level = grant.permission_level;
        let allowed_actions: Vec<String> = grant
            .allowed_actions()
            .iter()
            .map(|action| action.to_string())
            .collect();

        let (can_access, reason) = match requested_action {
            Some(action) if !level.can_perform(action) => (
                false,
                format!(
                    "Folder is reachable through profile '{}' but {} permission cannot perform '{}'",
                    profile.name,
                    level.display_name(),
                    action
                ),
            ),
            _ => (
                true,
                format!(
                    "Access granted through profile '{}' with {} permission on {}",
                    profile.name, level, grant.folder_path
                ),
            ),
        };

        AccessDecision {
            can_access,
            permission_level: Some(level),
            allowed_actions,
            reason,
            matching_profiles,
            matching_grants,
        }
    }

    /// Aggregate everything the user holds org-wide.
    ///
    /// Actions are unioned across all grants of all valid assignments;
    /// folders are listed only where a direct grant exists (no descendant
    /// expansion); per-folder levels keep the highest seen across profiles.
    pub fn build_user_context(bindings: &[ProfileBinding]) -> UserAccessContext {
        let mut context = UserAccessContext::default();

        for binding in bindings {
            if !binding.assignment.is_valid() || !binding.profile.is_active {
                continue;
            }
            for grant in &binding.grants {
                if !grant.is_active {
                    continue;
                }
                context.effective_permissions.extend(
                    grant.allowed_actions().iter().map(|action| action.to_string()),
                );
                let folder = grant.folder_path.as_str().to_string();
                context.accessible_folders.insert(folder.clone());
                context
                    .folder_levels
                    .entry(folder)
                    .and_modify(|level| {
                        if grant.permission_level.is_higher_than(level) {
                            *level = grant.permission_level;
                        }
                    })
                    .or_insert(grant.permission_level);
            }
        }

        context
    }

    /// Project grants into a folder × profile grid plus per-level counts.
    /// Pure projection; no conflict resolution happens here.
    pub fn build_matrix(
        rows: &[MatrixRow],
        folder_filter: Option<&[String]>,
        profile_filter: Option<&[ProfileId]>,
        include_inactive: bool,
    ) -> PermissionMatrix {
        let mut matrix: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut folder_paths: BTreeSet<String> = BTreeSet::new();
        let mut profile_names: BTreeSet<String> = BTreeSet::new();
        let mut level_counts: BTreeMap<String, usize> = BTreeMap::new();

        for row in rows {
            let grant = &row.grant;
            if !include_inactive && !grant.is_active {
                continue;
            }
            if let Some(folders) = folder_filter {
                if !folders.iter().any(|f| f == grant.folder_path.as_str()) {
                    continue;
                }
            }
            if let Some(profiles) = profile_filter {
                if !profiles.contains(&grant.profile_id) {
                    continue;
                }
            }

            let folder = grant.folder_path.as_str().to_string();
            matrix
                .entry(folder.clone())
                .or_default()
                .insert(row.profile_name.clone(), grant.permission_level.to_string());
            folder_paths.insert(folder);
            profile_names.insert(row.profile_name.clone());
            *level_counts
                .entry(grant.permission_level.to_string())
                .or_insert(0) += 1;
        }

        PermissionMatrix {
            matrix,
            folder_paths: folder_paths.into_iter().collect(),
            profile_names: profile_names.into_iter().collect(),
            level_counts,
        }
    }
}
