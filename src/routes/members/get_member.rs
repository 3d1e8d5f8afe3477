use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use color_eyre::eyre::eyre;

use super::MemberResponse;
use crate::{
    domain::{MemberAPIError, MemberId, MemberStoreError},
    AppState,
};

#[tracing::instrument(name = "Get member route handler", skip_all)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MemberResponse>), MemberAPIError> {
    let member_id = MemberId::parse(&id)?;

    let member = state
        .member_store
        .get_member(&member_id)
        .await
        .map_err(|e| match e {
            MemberStoreError::MemberNotFound => {
                MemberAPIError::MemberNotFound(member_id)
            }
            e => MemberAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok((StatusCode::OK, Json(MemberResponse::from(&member))))
}
