use thiserror::Error;
use uuid::Uuid;

/// The common error type used by this crate.
///
/// "Is this allowed" questions are answered with booleans or decision values,
/// never with errors; errors are reserved for malformed input, blocked
/// operations, and storage failures. Nothing here is fatal — every variant is
/// meant to be translated into a caller-facing response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    /// A folder path failed format validation
    #[error("invalid folder path: {0}")]
    InvalidFolderPath(String),

    /// A raw string could not be interpreted as a permission level
    #[error("invalid permission level: {0}")]
    InvalidPermissionLevel(String),

    /// An entity failed field validation; one message per failed check
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The operation is well-formed but blocked by a lifecycle rule
    #[error("{0}")]
    PolicyViolation(String),

    /// A new or moved grant would overlap active grants on the same profile
    #[error("grant overlaps {} existing active grant(s)", conflicting.len())]
    GrantConflict { conflicting: Vec<Uuid> },

    /// An active grant already exists for this profile and folder
    #[error("active grant {existing} already targets '{folder_path}'")]
    DuplicateGrant { existing: Uuid, folder_path: String },

    /// The user already holds an active assignment of this profile
    #[error("assignment {existing} already binds this user and profile")]
    DuplicateAssignment { existing: Uuid },

    /// Profile names are unique per organization
    #[error("profile name '{0}' is already in use in this organization")]
    DuplicateProfileName(String),

    /// An identifier did not resolve
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// The storage adapter failed
    #[error("storage operation failed: {0}")]
    Storage(String),
}

impl AccessError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn policy(reason: impl Into<String>) -> Self {
        Self::PolicyViolation(reason.into())
    }
}
