//! Profile-based folder access control for the document vault.
//!
//! Organizations compose reusable named profiles out of per-folder permission
//! grants and bind them to users through time-boxed assignments. This crate
//! owns the domain model and the access-resolution algorithm; storage and
//! transport live behind the ports in [`application::ports`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::entities::{Assignment, FolderGrant, Profile};
pub use domain::services::AccessResolver;
pub use domain::value_objects::{FolderPath, PermissionLevel};
pub use error::AccessError;
