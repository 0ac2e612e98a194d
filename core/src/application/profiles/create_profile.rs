use serde_json::{Map, Value};
use tracing::info;

use crate::application::ports::ProfileRepository;
use crate::domain::entities::Profile;
use crate::domain::value_objects::{OrganizationId, UserId};
use crate::error::AccessError;

pub struct CreateProfileCommand {
    pub name: String,
    pub description: String,
    pub organization_id: OrganizationId,
    pub created_by: UserId,
    pub is_system_profile: bool,
    pub metadata: Option<Map<String, Value>>,
}

pub async fn execute<P: ProfileRepository + ?Sized>(
    profiles: &P,
    cmd: CreateProfileCommand,
) -> Result<Profile, AccessError> {
    let name = cmd.name.trim();
    if profiles.exists_by_name(name, cmd.organization_id).await? {
        return Err(AccessError::DuplicateProfileName(name.to_string()));
    }

    let profile = Profile::create(
        &cmd.name,
        &cmd.description,
        cmd.organization_id,
        cmd.created_by,
        cmd.is_system_profile,
        cmd.metadata,
    )?;
    profiles.save(&profile).await?;

    info!(profile_id = %profile.id, name = %profile.name, "profile created");
    Ok(profile)
}
