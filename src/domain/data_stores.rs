use super::{Member, MemberId};
use color_eyre::eyre::Report;
use thiserror::Error;

/// Storage for roster members. Implementations hold no state between
/// calls apart from their connection handle, so a single instance is
/// shared by every request.
#[async_trait::async_trait]
pub trait MemberStore {
    async fn get_members(&self) -> Result<Vec<Member>, MemberStoreError>;
    async fn get_member(
        &self,
        id: &MemberId,
    ) -> Result<Member, MemberStoreError>;
    /// Persists a new member and returns it with its assigned ID.
    async fn add_member(
        &self,
        member: Member,
    ) -> Result<Member, MemberStoreError>;
    /// Overwrites every field of the member with `member.id`. Fails with
    /// `MemberNotFound` when no row was affected.
    async fn update_member(
        &self,
        member: &Member,
    ) -> Result<(), MemberStoreError>;
    async fn delete_member(&self, id: &MemberId)
        -> Result<(), MemberStoreError>;
}

#[derive(Debug, Error)]
pub enum MemberStoreError {
    #[error("Member not found")]
    MemberNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for MemberStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::MemberNotFound, Self::MemberNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
