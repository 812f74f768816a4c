//! Input validation for user-supplied query material.
//!
//! Everything arriving from chat commands is checked here before any graph
//! work happens: room ids, search fragments, and 1-based result selections.

use thiserror::Error;

use crate::mapper::MapperError;

/// Longest room id we accept; real ids are short content hashes.
const MAX_ROOM_ID_LEN: usize = 64;

/// Longest search fragment worth scanning for.
const MAX_FRAGMENT_LEN: usize = 120;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("room id is empty")]
    EmptyRoomId,

    #[error("room id is too long (max {MAX_ROOM_ID_LEN} characters)")]
    RoomIdTooLong,

    #[error("room id contains whitespace or control characters")]
    MalformedRoomId,

    #[error("search fragment is empty")]
    EmptyFragment,

    #[error("search fragment is too long (max {MAX_FRAGMENT_LEN} characters)")]
    FragmentTooLong,

    #[error("selection {index} is out of range (1..={count})")]
    SelectionOutOfRange { index: usize, count: usize },
}

impl From<ValidationError> for MapperError {
    fn from(err: ValidationError) -> Self {
        MapperError::InvalidInput(err.to_string())
    }
}

/// Check a room id's shape. Does not check existence; the store does that.
pub fn validate_room_id(room_id: &str) -> Result<&str, ValidationError> {
    if room_id.is_empty() {
        return Err(ValidationError::EmptyRoomId);
    }
    if room_id.len() > MAX_ROOM_ID_LEN {
        return Err(ValidationError::RoomIdTooLong);
    }
    if room_id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::MalformedRoomId);
    }
    Ok(room_id)
}

/// Trim and check a search fragment, rejecting blank or oversized input.
pub fn validate_fragment(fragment: &str) -> Result<&str, ValidationError> {
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyFragment);
    }
    if trimmed.len() > MAX_FRAGMENT_LEN {
        return Err(ValidationError::FragmentTooLong);
    }
    Ok(trimmed)
}

/// Check a 1-based selection against the most recent result list length.
pub fn validate_selection(index: usize, count: usize) -> Result<usize, ValidationError> {
    if index == 0 || index > count {
        return Err(ValidationError::SelectionOutOfRange { index, count });
    }
    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_id_shape_checks() {
        assert!(validate_room_id("abc123").is_ok());
        assert!(matches!(
            validate_room_id(""),
            Err(ValidationError::EmptyRoomId)
        ));
        assert!(matches!(
            validate_room_id("two words"),
            Err(ValidationError::MalformedRoomId)
        ));
        let long = "x".repeat(65);
        assert!(matches!(
            validate_room_id(&long),
            Err(ValidationError::RoomIdTooLong)
        ));
    }

    #[test]
    fn fragments_are_trimmed_and_rejected_when_blank() {
        assert_eq!(validate_fragment("  drum  ").unwrap(), "drum");
        assert!(matches!(
            validate_fragment("   "),
            Err(ValidationError::EmptyFragment)
        ));
    }

    #[test]
    fn selections_are_one_based() {
        assert_eq!(validate_selection(1, 3).unwrap(), 0);
        assert_eq!(validate_selection(3, 3).unwrap(), 2);
        assert!(validate_selection(0, 3).is_err());
        assert!(validate_selection(4, 3).is_err());
    }
}
