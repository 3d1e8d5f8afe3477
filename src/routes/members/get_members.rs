use axum::{extract::State, http::StatusCode, Json};
use color_eyre::eyre::eyre;

use super::MemberResponse;
use crate::{domain::MemberAPIError, AppState};

#[tracing::instrument(name = "Get members route handler", skip_all)]
pub async fn get_members(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<MemberResponse>>), MemberAPIError> {
    let members = state
        .member_store
        .get_members()
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;

    let response = members.iter().map(MemberResponse::from).collect();

    Ok((StatusCode::OK, Json(response)))
}
