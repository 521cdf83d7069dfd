use axum::Json;
use axum::extract::Extension;
use axum::http::{StatusCode, Uri};
use store_ratings_sdk::{NewUser, UserListQuery};
use uuid::Uuid;

use super::Svc;
use crate::api::rest::dto::{CreateUserReq, DashboardDto, UserDto, UserListParams, UserWithStoreDto};
use crate::api::rest::error::{ApiResult, OrProblem};
use crate::api::rest::extract::{ApiJson, ApiPath, ApiQuery, Authenticated};

#[tracing::instrument(skip_all, fields(admin_id = %principal.id))]
pub async fn dashboard(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
) -> ApiResult<Json<DashboardDto>> {
    let stats = svc.dashboard().await.or_problem(&uri)?;
    Ok(Json(stats.into()))
}

#[tracing::instrument(skip_all, fields(admin_id = %principal.id))]
pub async fn list_users(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
    ApiQuery(params): ApiQuery<UserListParams>,
) -> ApiResult<Json<Vec<UserWithStoreDto>>> {
    let query = UserListQuery::try_from(params).or_problem(&uri)?;
    let users = svc.list_users(&query).await.or_problem(&uri)?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[tracing::instrument(skip_all, fields(admin_id = %principal.id, user_id = %id))]
pub async fn get_user(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<UserWithStoreDto>> {
    let user = svc.get_user(id).await.or_problem(&uri)?;
    Ok(Json(user.into()))
}

#[tracing::instrument(skip_all, fields(admin_id = %principal.id))]
pub async fn create_user(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
    ApiJson(req): ApiJson<CreateUserReq>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    let new_user = NewUser::try_from(req).or_problem(&uri)?;
    let user = svc.create_user(new_user).await.or_problem(&uri)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}
