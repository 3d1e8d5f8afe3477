use serde::Deserialize;
use thiserror::Error;

use super::{
    ContractDuration, Member, MemberKind, MemberName, MemberRole, MemberType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemberValidationError {
    #[error("Members must have a name")]
    MissingName,
    #[error("Contractors must have a duration")]
    MissingDuration,
    #[error("Contractors must not have a role")]
    UnexpectedRole,
    #[error("Employees must have a role")]
    MissingRole,
    #[error("Employees must not have a duration")]
    UnexpectedDuration,
    #[error("Invalid member type, please use 'contractor' or 'employee'")]
    InvalidType,
}

/// Member fields as they arrive, before any rule has been applied.
/// Absent and `null` fields read as their zero value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MemberFields {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub member_type: Option<String>,
    pub role: Option<String>,
    pub duration: Option<i32>,
    pub tags: Option<Vec<String>>,
}

impl MemberFields {
    pub fn validate(self) -> Result<Member, MemberValidationError> {
        validate_member(self)
    }
}

/// Applies the member rules top to bottom and stops at the first one
/// broken: name first, then the type, then the rules for that type.
pub fn validate_member(
    fields: MemberFields,
) -> Result<Member, MemberValidationError> {
    let name = MemberName::parse(fields.name.unwrap_or_default())?;
    let role = fields.role.unwrap_or_default();
    let duration = fields.duration.unwrap_or_default();

    let member_type = MemberType::parse(
        fields.member_type.as_deref().unwrap_or_default(),
    )?;

    let kind = match member_type {
        MemberType::Contractor => {
            let duration = ContractDuration::parse(duration)?;
            if !role.is_empty() {
                return Err(MemberValidationError::UnexpectedRole);
            }
            MemberKind::Contractor { duration }
        }
        MemberType::Employee => {
            let role = MemberRole::parse(role)?;
            if duration != 0 {
                return Err(MemberValidationError::UnexpectedDuration);
            }
            MemberKind::Employee { role }
        }
    };

    Ok(Member::new(name, kind, fields.tags.unwrap_or_default()))
}
