//! Submission state machine and reviewer feedback rules.
//!
//! ```text
//!            approve
//! pending ──────────▶ approved   (terminal)
//!    │
//!    └──────────────▶ rejected   (terminal)
//!            reject (feedback required)
//! ```
//!
//! A resolved submission never changes again; the author creates a new
//! submission instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// Feedback stored when a reviewer approves without writing anything.
pub const DEFAULT_APPROVAL_FEEDBACK: &str = "Approved without feedback";

/// Maximum length of reviewer feedback.
pub const MAX_FEEDBACK_LENGTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => STATUS_PENDING,
            SubmissionStatus::Approved => STATUS_APPROVED,
            SubmissionStatus::Rejected => STATUS_REJECTED,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(SubmissionStatus::Pending),
            STATUS_APPROVED => Ok(SubmissionStatus::Approved),
            STATUS_REJECTED => Ok(SubmissionStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid submission status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for SubmissionStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A reviewer's decision on a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// Status the submission moves to when this decision is applied.
    pub fn target_status(&self) -> SubmissionStatus {
        match self {
            ReviewDecision::Approve => SubmissionStatus::Approved,
            ReviewDecision::Reject => SubmissionStatus::Rejected,
        }
    }
}

/// Apply `decision` to a submission currently in `current`.
///
/// Only `pending` submissions can be decided.
pub fn transition(
    current: SubmissionStatus,
    decision: ReviewDecision,
) -> Result<SubmissionStatus, CoreError> {
    match current {
        SubmissionStatus::Pending => Ok(decision.target_status()),
        resolved => Err(CoreError::InvalidState(format!(
            "Submission is already {resolved}; only pending submissions can be reviewed"
        ))),
    }
}

/// Normalise reviewer feedback for `decision`.
///
/// Approvals fall back to [`DEFAULT_APPROVAL_FEEDBACK`]; rejections require
/// non-blank feedback.
pub fn resolve_feedback(
    decision: ReviewDecision,
    feedback: Option<&str>,
) -> Result<String, CoreError> {
    let trimmed = feedback.map(str::trim).filter(|f| !f.is_empty());

    if let Some(text) = trimmed {
        if text.chars().count() > MAX_FEEDBACK_LENGTH {
            return Err(CoreError::Validation(format!(
                "Feedback exceeds maximum length of {MAX_FEEDBACK_LENGTH} characters"
            )));
        }
    }

    match (decision, trimmed) {
        (_, Some(text)) => Ok(text.to_string()),
        (ReviewDecision::Approve, None) => Ok(DEFAULT_APPROVAL_FEEDBACK.to_string()),
        (ReviewDecision::Reject, None) => Err(CoreError::Validation(
            "Feedback is required when rejecting a submission".to_string(),
        )),
    }
}
