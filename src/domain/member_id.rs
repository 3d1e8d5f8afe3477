use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage-assigned member identifier. Zero until the member is persisted.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct MemberId(i32);

impl MemberId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let parsed = id.parse::<i32>().map_err(|e| {
            ValidationError::new(format!("Invalid member ID: {e}"))
        })?;
        Ok(Self(parsed))
    }

    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl AsRef<i32> for MemberId {
    fn as_ref(&self) -> &i32 {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[test]
fn test_valid_ids() {
    for valid_id in ["1", "42", "2147483647"] {
        let parsed = MemberId::parse(valid_id).expect(valid_id);
        assert_eq!(
            parsed.to_string(),
            valid_id,
            "ID does not match expected value"
        );
    }
}

#[test]
fn test_invalid_ids() {
    let invalid_ids = ["abc", "", "1.5", "12abc", "2147483648"];
    for invalid_id in invalid_ids {
        let error = MemberId::parse(invalid_id).expect_err(invalid_id);
        assert!(
            error.as_ref().starts_with("Invalid member ID"),
            "Unexpected error message for {invalid_id}: {}",
            error.as_ref()
        );
    }
}

#[test]
fn test_default_id_is_unassigned() {
    assert!(!MemberId::default().is_assigned());
    assert!(MemberId::new(7).is_assigned());
}
