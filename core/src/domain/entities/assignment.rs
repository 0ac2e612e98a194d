use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::value_objects::{OrganizationId, ProfileId, UserId};
use crate::error::AccessError;

/// Active assignments younger than this must be revoked, not deleted.
pub const ASSIGNMENT_DELETE_AGE_DAYS: i64 = 365;

const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 7;

/// A time-boxed binding of one profile to one user within an organization.
///
/// Expiry is computed from `expires_at`, never stored: an assignment can sit
/// at `is_active = true` after its expiry passes, so consumers must gate on
/// [`Assignment::is_valid`] rather than the flag alone. `revoked_at` and
/// `revoked_by` travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub user_id: UserId,
    pub profile_id: ProfileId,
    pub organization_id: OrganizationId,
    pub assigned_by: UserId,
    pub assigned_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revoked_by: Option<UserId>,
    pub notes: Option<String>,
    /// Opaque metadata; the core never branches on its contents.
    pub extra_data: Map<String, Value>,
}

impl Assignment {
    pub fn create(
        user_id: UserId,
        profile_id: ProfileId,
        organization_id: OrganizationId,
        assigned_by: UserId,
        expires_at: Option<DateTime<Utc>>,
        notes: Option<String>,
        extra_data: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            profile_id,
            organization_id,
            assigned_by,
            assigned_at: Utc::now(),
            expires_at,
            is_active: true,
            revoked_at: None,
            revoked_by: None,
            notes,
            extra_data: extra_data.unwrap_or_default(),
        }
    }

    /// Point the assignment at another profile. Attribution is re-stamped and
    /// any revocation markers are cleared.
    pub fn change_profile(&self, new_profile_id: ProfileId, changed_by: UserId) -> Self {
        Self {
            profile_id: new_profile_id,
            assigned_by: changed_by,
            assigned_at: Utc::now(),
            revoked_at: None,
            revoked_by: None,
            ..self.clone()
        }
    }

    /// Push the expiry out (or set one on a permanent assignment). The new
    /// instant must be strictly in the future.
    pub fn extend_expiration(&self, new_expires_at: DateTime<Utc>) -> Result<Self, AccessError> {
        if new_expires_at <= Utc::now() {
            return Err(AccessError::Validation(vec![
                "Expiration date must be in the future".to_string(),
            ]));
        }
        Ok(Self {
            expires_at: Some(new_expires_at),
            ..self.clone()
        })
    }

    /// Reclassifies the assignment as permanent.
    pub fn remove_expiration(&self) -> Self {
        Self {
            expires_at: None,
            ..self.clone()
        }
    }

    pub fn update_notes(&self, notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..self.clone()
        }
    }

    /// Shallow union; incoming keys win.
    pub fn merge_extra_data(&self, extra_data: Map<String, Value>) -> Self {
        let mut merged = self.extra_data.clone();
        merged.extend(extra_data);
        Self {
            extra_data: merged,
            ..self.clone()
        }
    }

    pub fn deactivate(&self) -> Self {
        if !self.is_active {
            return self.clone();
        }
        Self {
            is_active: false,
            ..self.clone()
        }
    }

    /// Flip the flag back on, clearing revocation markers. Unlike
    /// [`Assignment::reactivate`] this does not re-stamp attribution.
    pub fn activate(&self) -> Self {
        Self {
            is_active: true,
            revoked_at: None,
            revoked_by: None,
            ..self.clone()
        }
    }

    /// Deactivate with an audit trail: stamps the revocation markers and
    /// appends a `Revoked` line to the notes.
    pub fn revoke(&self, revoked_by: UserId, reason: Option<&str>) -> Self {
        let line = match reason {
            Some(reason) => format!("Revoked: {reason}"),
            None => "Revoked".to_string(),
        };
        let notes = match &self.notes {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{line}"),
            _ => line,
        };
        Self {
            is_active: false,
            revoked_at: Some(Utc::now()),
            revoked_by: Some(revoked_by),
            notes: Some(notes),
            ..self.clone()
        }
    }

    /// Deliberate re-grant of a revoked assignment: clears revocation and
    /// re-stamps who assigned it and when.
    pub fn reactivate(&self, reactivated_by: UserId) -> Self {
        Self {
            is_active: true,
            revoked_at: None,
            revoked_by: None,
            assigned_by: reactivated_by,
            assigned_at: Utc::now(),
            ..self.clone()
        }
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }

    /// Active AND not expired. The stored flag alone is not enough.
    pub fn is_valid(&self) -> bool {
        self.is_active && !self.is_expired()
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_permanent(&self) -> bool {
        self.expires_at.is_none()
    }

    pub fn is_temporary(&self) -> bool {
        self.expires_at.is_some()
    }

    pub fn days_until_expiry(&self) -> Option<i64> {
        self.expires_at
            .map(|expires_at| (expires_at - Utc::now()).num_days().max(0))
    }

    pub fn is_expiring_soon(&self, days_ahead: Option<i64>) -> bool {
        let window = days_ahead.unwrap_or(DEFAULT_EXPIRY_WARNING_DAYS);
        match self.days_until_expiry() {
            Some(days) => days <= window,
            None => false,
        }
    }

    /// Days between assignment and revocation (or now, while unrevoked).
    pub fn duration_days(&self) -> i64 {
        let end = self.revoked_at.unwrap_or_else(Utc::now);
        (end - self.assigned_at).num_days()
    }

    pub fn can_be_modified(&self) -> (bool, &'static str) {
        if !self.is_active {
            return (false, "Inactive assignments cannot be modified");
        }
        if self.is_expired() {
            return (false, "Expired assignments cannot be modified");
        }
        (true, "Assignment can be modified")
    }

    pub fn can_be_deleted(&self) -> (bool, &'static str) {
        if !self.is_active {
            return (true, "Inactive assignment can be deleted");
        }
        if self.duration_days() > ASSIGNMENT_DELETE_AGE_DAYS {
            return (true, "Old assignment can be deleted");
        }
        (
            false,
            "Active recent assignments should be revoked instead of deleted",
        )
    }

    pub fn validate(&self) -> (bool, Vec<String>) {
        let mut errors = Vec::new();
        let now = Utc::now();

        if self.user_id.as_uuid().is_nil() {
            errors.push("User ID is required".to_string());
        }
        if self.profile_id.as_uuid().is_nil() {
            errors.push("Profile ID is required".to_string());
        }
        if self.organization_id.as_uuid().is_nil() {
            errors.push("Organization ID is required".to_string());
        }
        if self.assigned_by.as_uuid().is_nil() {
            errors.push("Assigned by is required".to_string());
        }
        if let Some(expires_at) = self.expires_at {
            if expires_at <= now {
                errors.push("Expiration date must be in the future".to_string());
            }
        }
        if self.assigned_at > now {
            errors.push("Assignment date cannot be in the future".to_string());
        }
        if self.revoked_at.is_some() && self.revoked_by.is_none() {
            errors.push("Revoked assignments must record revoked_by".to_string());
        }
        if self.revoked_by.is_some() && self.revoked_at.is_none() {
            errors.push("revoked_by requires revoked_at".to_string());
        }

        (errors.is_empty(), errors)
    }

    pub fn status(&self) -> &'static str {
        if !self.is_active {
            if self.is_revoked() {
                return "revoked";
            }
            return "inactive";
        }
        if self.is_expired() {
            return "expired";
        }
        if self.is_expiring_soon(None) {
            return "expiring_soon";
        }
        "active"
    }
}
