use std::fmt;
use std::num::NonZeroI32;

use serde::{Deserialize, Serialize};

use super::{MemberId, MemberName, MemberRole, MemberValidationError};

pub const EMPLOYEE: &str = "employee";
pub const CONTRACTOR: &str = "contractor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    Employee,
    Contractor,
}

impl MemberType {
    pub fn parse(member_type: &str) -> Result<Self, MemberValidationError> {
        match member_type {
            EMPLOYEE => Ok(Self::Employee),
            CONTRACTOR => Ok(Self::Contractor),
            _ => Err(MemberValidationError::InvalidType),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => EMPLOYEE,
            Self::Contractor => CONTRACTOR,
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract length, in months. Any value except zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDuration(NonZeroI32);

impl ContractDuration {
    pub fn parse(duration: i32) -> Result<Self, MemberValidationError> {
        NonZeroI32::new(duration)
            .map(Self)
            .ok_or(MemberValidationError::MissingDuration)
    }

    pub fn value_of(&self) -> i32 {
        self.0.get()
    }
}

/// The variant-specific half of a member. An employee carries a role and
/// never a duration; a contractor carries a duration and never a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    Employee { role: MemberRole },
    Contractor { duration: ContractDuration },
}

impl MemberKind {
    pub fn member_type(&self) -> MemberType {
        match self {
            Self::Employee { .. } => MemberType::Employee,
            Self::Contractor { .. } => MemberType::Contractor,
        }
    }

    /// Empty for contractors.
    pub fn role(&self) -> &str {
        match self {
            Self::Employee { role } => role.as_ref(),
            Self::Contractor { .. } => "",
        }
    }

    /// Zero for employees.
    pub fn duration(&self) -> i32 {
        match self {
            Self::Employee { .. } => 0,
            Self::Contractor { duration } => duration.value_of(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: MemberName,
    pub kind: MemberKind,
    pub tags: Vec<String>,
}

impl Member {
    pub fn new(name: MemberName, kind: MemberKind, tags: Vec<String>) -> Self {
        Self {
            id: MemberId::default(),
            name,
            kind,
            tags,
        }
    }

    pub fn with_id(self, id: MemberId) -> Self {
        Self { id, ..self }
    }
}
