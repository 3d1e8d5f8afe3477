use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use color_eyre::eyre::eyre;

use super::MemberResponse;
use crate::{
    domain::{MemberAPIError, MemberFields},
    AppState,
};

#[tracing::instrument(name = "Create member route handler", skip_all)]
pub async fn create_member(
    State(state): State<AppState>,
    request: Result<Json<MemberFields>, JsonRejection>,
) -> Result<(StatusCode, Json<MemberResponse>), MemberAPIError> {
    let Json(fields) = request
        .map_err(|e| MemberAPIError::MalformedRequest(e.body_text()))?;
    let member = fields.validate()?;

    let member = state
        .member_store
        .add_member(member)
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from(&member))))
}
