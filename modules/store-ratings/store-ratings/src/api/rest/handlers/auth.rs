use axum::Json;
use axum::extract::Extension;
use axum::http::{StatusCode, Uri};
use tracing::info;

use super::Svc;
use crate::api::rest::dto::{
    AuthSessionDto, ChangePasswordReq, LoginReq, MeDto, MessageDto, RegisterReq,
};
use crate::api::rest::error::{ApiResult, OrProblem};
use crate::api::rest::extract::{ApiJson, Authenticated};

#[tracing::instrument(skip_all)]
pub async fn register(
    uri: Uri,
    Extension(svc): Svc,
    ApiJson(req): ApiJson<RegisterReq>,
) -> ApiResult<(StatusCode, Json<AuthSessionDto>)> {
    let session = svc.register(req.into()).await.or_problem(&uri)?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[tracing::instrument(skip_all)]
pub async fn login(
    uri: Uri,
    Extension(svc): Svc,
    ApiJson(req): ApiJson<LoginReq>,
) -> ApiResult<Json<AuthSessionDto>> {
    let session = svc
        .login(&req.email, &req.password)
        .await
        .or_problem(&uri)?;
    Ok(Json(session.into()))
}

#[tracing::instrument(skip_all, fields(user_id = %principal.id))]
pub async fn me(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
) -> ApiResult<Json<MeDto>> {
    let user = svc.current_user(principal.id).await.or_problem(&uri)?;
    Ok(Json(MeDto { user: user.into() }))
}

#[tracing::instrument(skip_all, fields(user_id = %principal.id))]
pub async fn change_password(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
    ApiJson(req): ApiJson<ChangePasswordReq>,
) -> ApiResult<Json<MessageDto>> {
    info!("Password change requested");
    svc.change_password(principal.id, &req.current_password, &req.new_password)
        .await
        .or_problem(&uri)?;
    Ok(Json(MessageDto {
        message: "Password updated successfully".to_owned(),
    }))
}
