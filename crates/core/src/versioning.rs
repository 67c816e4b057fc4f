//! Version-number allocation and restore planning.
//!
//! Version numbers are dense per draft: the next number is always the highest
//! existing number plus one, starting at 1. A restore to version *k* deletes
//! every version above *k*, so the next checkpoint after it is *k + 1*.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, VersionNumber};

/// First version number allocated for a draft.
pub const FIRST_VERSION_NUMBER: VersionNumber = 1;

/// Next number to allocate given the current highest one (if any).
pub fn next_version_number(latest: Option<VersionNumber>) -> VersionNumber {
    latest.map_or(FIRST_VERSION_NUMBER, |n| n + 1)
}

/// The outcome a restore would have, computed before anything is committed so
/// the caller can confirm the destructive part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestorePlan {
    pub draft_id: DbId,
    pub target_version_number: VersionNumber,
    /// How many versions newer than the target will be deleted.
    pub deleted_count: i64,
}

/// Build a restore plan from the draft's existing version numbers.
///
/// Fails with `NotFound` when `target` is not one of `existing`.
pub fn plan_restore(
    draft_id: DbId,
    existing: &[VersionNumber],
    target: VersionNumber,
) -> Result<RestorePlan, CoreError> {
    if !existing.contains(&target) {
        return Err(CoreError::NotFound {
            entity: "DraftVersion",
            id: i64::from(target),
        });
    }
    let deleted_count = existing.iter().filter(|n| **n > target).count() as i64;
    Ok(RestorePlan {
        draft_id,
        target_version_number: target,
        deleted_count,
    })
}

/// Check a caller's confirmed deletion count against the current plan.
///
/// If the history moved between preview and commit the confirmation is stale
/// and the restore must not proceed.
pub fn check_confirmation(plan: &RestorePlan, expected: Option<i64>) -> Result<(), CoreError> {
    match expected {
        Some(count) if count != plan.deleted_count => Err(CoreError::Conflict(format!(
            "Restore would delete {} version(s) but {count} were confirmed; reload the history and retry",
            plan.deleted_count
        ))),
        _ => Ok(()),
    }
}

/// Validate a version number supplied by a caller.
pub fn validate_version_number(n: VersionNumber) -> Result<(), CoreError> {
    if n < FIRST_VERSION_NUMBER {
        return Err(CoreError::Validation(format!(
            "Version number must be at least {FIRST_VERSION_NUMBER}, got {n}"
        )));
    }
    Ok(())
}
