mod create_member;
mod delete_member;
mod get_member;
mod get_members;
mod update_member;

pub use create_member::create_member;
pub use delete_member::delete_member;
pub use get_member::get_member;
pub use get_members::get_members;
pub use update_member::update_member;

use axum::routing::MethodFilter;
use serde::{Deserialize, Serialize};

use crate::{
    domain::Member,
    server::{Route, RouteGroup},
    AppState,
};

pub const MEMBERS_PATH: &str = "/members";

pub fn member_routes() -> RouteGroup<AppState> {
    RouteGroup::new(MEMBERS_PATH)
        .route(Route::new(MethodFilter::GET, "/", get_members))
        .route(Route::new(MethodFilter::POST, "/", create_member))
        .route(Route::new(MethodFilter::GET, "/:id", get_member))
        .route(Route::new(MethodFilter::PUT, "/:id", update_member))
        .route(Route::new(MethodFilter::DELETE, "/:id", delete_member))
}

/// A member as returned to clients. Empty role, zero duration and empty
/// tags are left out.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub duration: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: *member.id.as_ref(),
            name: member.name.as_ref().to_owned(),
            member_type: member.kind.member_type().to_string(),
            role: member.kind.role().to_owned(),
            duration: member.kind.duration(),
            tags: member.tags.clone(),
        }
    }
}
