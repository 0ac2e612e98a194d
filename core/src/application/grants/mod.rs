pub mod create_grant;
pub mod delete_grant;
pub mod update_grant;
pub mod validate_grant;
