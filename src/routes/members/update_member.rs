use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use color_eyre::eyre::eyre;

use super::MemberResponse;
use crate::{
    domain::{MemberAPIError, MemberFields, MemberId, MemberStoreError},
    AppState,
};

/// Replaces every field of an existing member. The ID in the path wins
/// over any ID in the body.
#[tracing::instrument(name = "Update member route handler", skip_all)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<MemberFields>, JsonRejection>,
) -> Result<(StatusCode, Json<MemberResponse>), MemberAPIError> {
    let member_id = MemberId::parse(&id)?;
    let Json(fields) = request
        .map_err(|e| MemberAPIError::MalformedRequest(e.body_text()))?;
    let member = fields.validate()?.with_id(member_id);

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
        .update_member(&member)
        .await
        .map_err(not_found)?;

    Ok((StatusCode::OK, Json(MemberResponse::from(&member))))
}
