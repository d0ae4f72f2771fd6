use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{error, instrument, warn};
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{Pagination, UserListResponse, UserPayload, UserView};
use super::normalize::normalize_payload;
use super::repo::{RepoError, UserAccount};

#[utoipa::path(
    get,
    path = "/users",
    params(Pagination),
    responses(
        (status = 200, description = "A page of user accounts", body = UserListResponse),
        (status = 400, description = "Malformed or non-positive pagination values"),
        (status = 503, description = "Store unavailable"),
    ),
    tag = "users"
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<UserListResponse>, ApiError> {
    let Query(pagination) = pagination.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    pagination.validate().map_err(ApiError::from_validation)?;
    let meta = pagination.meta();

    let accounts = UserAccount::list(&state.db, meta.limit(), meta.offset())
        .await
        .map_err(|e| {
            error!(error = %e, "list user accounts failed");
            ApiError::Unavailable(e.to_string())
        })?;

    let data = accounts.into_iter().map(UserView::from).collect();
    Ok(Json(UserListResponse {
        data,
        pagination: meta,
    }))
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "The created user account", body = UserView),
        (status = 400, description = "Binding or validation failure, or duplicate user_name"),
        (status = 503, description = "Store unavailable"),
    ),
    tag = "users"
)]
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let record = normalize_payload(payload)?;

    let account = UserAccount::insert(&state.db, &record)
        .await
        .map_err(|e| match e {
            RepoError::Conflict => {
                warn!(user_name = %record.user_name, "duplicate user_name on create");
                ApiError::BadRequest("user_name already exists".into())
            }
            other => {
                error!(error = %other, "insert user account failed");
                ApiError::Unavailable(other.to_string())
            }
        })?;

    Ok((StatusCode::CREATED, Json(UserView::from(account))))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User account id")),
    responses(
        (status = 200, description = "The user account for that id", body = UserView),
        (status = 400, description = "Non-numeric id"),
        (status = 404, description = "No user account with that id"),
        (status = 503, description = "Store unavailable"),
    ),
    tag = "users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserView>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let account = UserAccount::find_by_id(&state.db, id)
        .await
        .map_err(|e| not_found_or_unavailable(e, id))?;
    Ok(Json(UserView::from(account)))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User account id")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "The updated user account", body = UserView),
        (status = 400, description = "Binding or validation failure, or duplicate user_name"),
        (status = 404, description = "No user account with that id"),
        (status = 503, description = "Store unavailable"),
    ),
    tag = "users"
)]
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<UserView>, ApiError> {
    // The path id is authoritative; any id in the body is ignored.
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let record = normalize_payload(payload)?;

    let account = UserAccount::update(&state.db, id, &record)
        .await
        .map_err(|e| match e {
            RepoError::Conflict => {
                warn!(user_name = %record.user_name, id, "duplicate user_name on update");
                ApiError::BadRequest("user_name already exists".into())
            }
            other => not_found_or_unavailable(other, id),
        })?;
    Ok(Json(UserView::from(account)))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User account id")),
    responses(
        (status = 204, description = "The user account was deleted"),
        (status = 400, description = "Non-numeric id"),
        (status = 404, description = "No user account with that id"),
        (status = 503, description = "Store unavailable"),
    ),
    tag = "users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    UserAccount::delete(&state.db, id)
        .await
        .map_err(|e| not_found_or_unavailable(e, id))?;
    Ok(StatusCode::NO_CONTENT)
}

fn not_found_or_unavailable(err: RepoError, id: i64) -> ApiError {
    match err {
        RepoError::NotFound => ApiError::NotFound("User Account not found".into()),
        other => {
            error!(error = %other, id, "store call failed");
            ApiError::Unavailable(other.to_string())
        }
    }
}
