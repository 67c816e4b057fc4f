//! Real-time room identifiers.
//!
//! Every draft has exactly one room, named `draft-<id>`. Parsing is strict so
//! that each room string maps back to exactly one draft and vice versa: no
//! sign, no leading zeros, no surrounding whitespace.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROOM_PREFIX: &str = "draft-";

/// The room identifier for a draft.
pub fn room_id_for(draft_id: DbId) -> String {
    format!("{ROOM_PREFIX}{draft_id}")
}

/// Invert [`room_id_for`].
pub fn parse_room_id(room_id: &str) -> Result<DbId, CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid room id '{room_id}'"));

    let digits = room_id.strip_prefix(ROOM_PREFIX).ok_or_else(invalid)?;
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return Err(invalid());
    }

    let draft_id: DbId = digits.parse().map_err(|_| invalid())?;
    if draft_id <= 0 {
        return Err(invalid());
    }
    Ok(draft_id)
}
