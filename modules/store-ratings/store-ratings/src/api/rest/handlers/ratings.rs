use axum::Json;
use axum::extract::Extension;
use axum::http::{StatusCode, Uri};
use store_ratings_sdk::RatingSubmission;
use uuid::Uuid;

use super::Svc;
use crate::api::rest::dto::{StoreRatingsDto, SubmitRatingReq, SubmitRatingResp};
use crate::api::rest::error::{ApiResult, OrProblem};
use crate::api::rest::extract::{ApiJson, ApiPath, Authenticated};

/// 201 when the rating was created, 200 when an existing one was overwritten.
#[tracing::instrument(skip_all, fields(user_id = %principal.id))]
pub async fn submit_rating(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
    ApiJson(req): ApiJson<SubmitRatingReq>,
) -> ApiResult<(StatusCode, Json<SubmitRatingResp>)> {
    let submission = RatingSubmission::try_from(req).or_problem(&uri)?;
    let submitted = svc
        .submit_rating(principal.id, submission)
        .await
        .or_problem(&uri)?;

    let (status, message) = if submitted.created {
        (StatusCode::CREATED, "Rating submitted successfully")
    } else {
        (StatusCode::OK, "Rating updated successfully")
    };
    Ok((
        status,
        Json(SubmitRatingResp {
            message: message.to_owned(),
            rating: submitted.rating.into(),
        }),
    ))
}

#[tracing::instrument(skip_all, fields(user_id = %principal.id, store_id = %store_id))]
pub async fn delete_rating(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
    ApiPath(store_id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    svc.delete_rating(principal.id, store_id)
        .await
        .or_problem(&uri)?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip_all, fields(owner_id = %principal.id))]
pub async fn owner_store_ratings(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
) -> ApiResult<Json<StoreRatingsDto>> {
    let report = svc
        .owner_store_ratings(principal.id, principal.store_id)
        .await
        .or_problem(&uri)?;
    Ok(Json(report.into()))
}
