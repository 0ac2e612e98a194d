pub mod access_resolver;

pub use access_resolver::{
    AccessDecision, AccessResolver, MatrixRow, PermissionMatrix, ProfileBinding,
    UserAccessContext,
};
