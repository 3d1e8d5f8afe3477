use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    app_state::MemberNotifierType,
    domain::{Member, MemberId, MemberStore, MemberStoreError},
    services::member_notifier::dispatch_member_created,
};

/// A call received by [`HashmapMemberStore`], with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberStoreCall {
    GetMembers,
    GetMember(MemberId),
    AddMember(Member),
    UpdateMember(Member),
    DeleteMember(MemberId),
}

#[derive(Default)]
struct Members {
    by_id: BTreeMap<MemberId, Member>,
    last_id: i32,
    calls: Vec<MemberStoreCall>,
}

/// In-memory member store. Keeps a log of every call so tests can check
/// exactly what reached storage.
#[derive(Default)]
pub struct HashmapMemberStore {
    members: Mutex<Members>,
    notifier: Option<MemberNotifierType>,
}

impl HashmapMemberStore {
    pub fn with_notifier(notifier: MemberNotifierType) -> Self {
        Self {
            members: Mutex::default(),
            notifier: Some(notifier),
        }
    }

    pub fn calls(&self) -> Vec<MemberStoreCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Members> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl MemberStore for HashmapMemberStore {
    async fn get_members(&self) -> Result<Vec<Member>, MemberStoreError> {
        let mut members = self.lock();
        members.calls.push(MemberStoreCall::GetMembers);
        Ok(members.by_id.values().cloned().collect())
    }

    async fn get_member(
        &self,
        id: &MemberId,
    ) -> Result<Member, MemberStoreError> {
        let mut members = self.lock();
        members.calls.push(MemberStoreCall::GetMember(*id));
        match members.by_id.get(id) {
            Some(member) => Ok(member.clone()),
            None => Err(MemberStoreError::MemberNotFound),
        }
    }

    async fn add_member(
        &self,
        member: Member,
    ) -> Result<Member, MemberStoreError> {
        let member = {
            let mut members = self.lock();
            members.calls.push(MemberStoreCall::AddMember(member.clone()));
            members.last_id += 1;
            let member = member.with_id(MemberId::new(members.last_id));
            members.by_id.insert(member.id, member.clone());
            member
        };

        if let Some(notifier) = &self.notifier {
            dispatch_member_created(notifier.clone(), member.name.clone());
        }

        Ok(member)
    }

    async fn update_member(
        &self,
        member: &Member,
    ) -> Result<(), MemberStoreError> {
        let mut members = self.lock();
        members
            .calls
            .push(MemberStoreCall::UpdateMember(member.clone()));
        match members.by_id.get_mut(&member.id) {
            Some(stored) => {
                *stored = member.clone();
                Ok(())
            }
            None => Err(MemberStoreError::MemberNotFound),
        }
    }

    async fn delete_member(
        &self,
        id: &MemberId,
    ) -> Result<(), MemberStoreError> {
        let mut members = self.lock();
        members.calls.push(MemberStoreCall::DeleteMember(*id));
        match members.by_id.remove(id) {
            Some(_) => Ok(()),
            None => Err(MemberStoreError::MemberNotFound),
        }
    }
}
