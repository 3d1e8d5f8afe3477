use std::sync::Arc;

use crate::domain::{MemberNotifier, MemberStore};

pub type MemberStoreType = Arc<dyn MemberStore + Send + Sync>;
pub type MemberNotifierType = Arc<dyn MemberNotifier + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub member_store: MemberStoreType,
}

impl AppState {
    pub fn new(member_store: MemberStoreType) -> Self {
        Self { member_store }
    }
}
