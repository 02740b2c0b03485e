use axum::{
    extract::{Path, State},
    Extension,
};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RawBody};
use crate::server::AppState;
use crate::services::programmer::{MergeMode, ProgrammerList, ProgrammerView};

pub const PROGRAMMERS_PATH: &str = "/programmers";

/// Read path of a programmer, with the nickname percent-encoded
pub fn programmer_location(nickname: &str) -> Result<String, ApiError> {
    let mut url = url::Url::parse("http://localhost/programmers")
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::internal_server_error("cannot build programmer URL"))?
        .push(nickname);
    Ok(url.path().to_string())
}

fn caller(user: &Option<Extension<AuthUser>>) -> Option<&AuthUser> {
    user.as_ref().map(|Extension(user)| user)
}

/// POST /programmers - Create a programmer owned by the caller
pub async fn create(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    body: RawBody,
) -> ApiResult<ProgrammerView> {
    let view = state.programmers().create(&body, caller(&user)).await?;
    let location = programmer_location(&view.nickname)?;
    Ok(ApiResponse::created(view, location))
}

/// GET /programmers - List every programmer
pub async fn list(State(state): State<AppState>) -> ApiResult<ProgrammerList> {
    Ok(ApiResponse::success(state.programmers().list().await?))
}

/// GET /programmers/:nickname
pub async fn show(State(state): State<AppState>, Path(nickname): Path<String>) -> ApiResult<ProgrammerView> {
    Ok(ApiResponse::success(state.programmers().show(&nickname).await?))
}

/// PUT /programmers/:nickname - Replace the mutable fields; omitted ones are cleared
pub async fn replace(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    user: Option<Extension<AuthUser>>,
    body: RawBody,
) -> ApiResult<ProgrammerView> {
    let view = state
        .programmers()
        .update(&nickname, &body, MergeMode::Replace, caller(&user))
        .await?;
    Ok(ApiResponse::success(view))
}

/// PATCH /programmers/:nickname - Change only the fields present in the body
pub async fn patch(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    user: Option<Extension<AuthUser>>,
    body: RawBody,
) -> ApiResult<ProgrammerView> {
    let view = state
        .programmers()
        .update(&nickname, &body, MergeMode::Partial, caller(&user))
        .await?;
    Ok(ApiResponse::success(view))
}

/// DELETE /programmers/:nickname
pub async fn delete(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<()> {
    state.programmers().delete(&nickname, caller(&user)).await?;
    Ok(ApiResponse::no_content())
}
