//! Resolved caller identity and onboarding rules.

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Maximum length of a display name.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// A verified caller, as seen by every component after authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: DbId,
    pub email: String,
    pub role: Role,
    pub display_name: Option<String>,
    pub profile_complete: bool,
}

impl Identity {
    pub fn new(user_id: DbId, email: String, role: Role, display_name: Option<String>) -> Self {
        let profile_complete = is_profile_complete(role, display_name.as_deref());
        Self {
            user_id,
            email,
            role,
            display_name,
            profile_complete,
        }
    }

    /// Name shown to other users; falls back to the email address.
    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    /// Callers with an incomplete profile must finish onboarding before any
    /// write is accepted.
    pub fn require_complete_profile(&self) -> Result<(), CoreError> {
        if self.profile_complete {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Profile setup required: choose a role and display name first".to_string(),
            ))
        }
    }
}

/// A profile is complete once it has both a role and a display name.
pub fn is_profile_complete(role: Role, display_name: Option<&str>) -> bool {
    role.is_assigned() && display_name.is_some_and(|n| !n.trim().is_empty())
}

/// Trim and validate a display name.
pub fn normalize_display_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Display name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Display name must be at most {MAX_DISPLAY_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Lowercase and sanity-check an email address.
pub fn normalize_email(email: &str) -> Result<String, CoreError> {
    let email = email.trim().to_lowercase();
    let valid = email.len() <= MAX_EMAIL_LENGTH
        && !email.chars().any(char::is_whitespace)
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        });
    if !valid {
        return Err(CoreError::Validation(format!(
            "Invalid email address '{email}'"
        )));
    }
    Ok(email)
}
