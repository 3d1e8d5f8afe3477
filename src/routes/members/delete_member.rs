use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use color_eyre::eyre::eyre;

use crate::{
    domain::{MemberAPIError, MemberId, MemberStoreError},
    AppState,
};

#[tracing::instrument(name = "Delete member route handler", skip_all)]
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, MemberAPIError> {
    let member_id = MemberId::parse(&id)?;

    let not_found = |e: MemberStoreError| match e {
        MemberStoreError::MemberNotFound => {
            MemberAPIError::MemberNotFound(member_id)
        }
        e => MemberAPIError::UnexpectedError(eyre!(e)),
    };

    state
        .member_store
        .get_member(&member_id)
        .await
        .map_err(not_found)?;

    state
        .member_store
        .delete_member(&member_id)
        .await
        .map_err(not_found)?;

    Ok(StatusCode::NO_CONTENT)
}
