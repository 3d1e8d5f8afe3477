use super::MemberValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberName(String);

impl MemberName {
    pub fn parse(name: String) -> Result<Self, MemberValidationError> {
        if name.is_empty() {
            return Err(MemberValidationError::MissingName);
        }
        Ok(Self(name))
    }
}

impl AsRef<String> for MemberName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRole(String);

impl MemberRole {
    pub fn parse(role: String) -> Result<Self, MemberValidationError> {
        if role.is_empty() {
            return Err(MemberValidationError::MissingRole);
        }
        Ok(Self(role))
    }
}

impl AsRef<String> for MemberRole {
    fn as_ref(&self) -> &String {
        &self.0
    }
}
