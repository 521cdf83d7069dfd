use axum::Json;
use axum::extract::Extension;
use axum::http::{StatusCode, Uri};
use store_ratings_sdk::{Role, StoreAdminQuery, StoreSearchQuery};

use super::Svc;
use crate::api::rest::dto::{
    CreateStoreReq, OwnerDto, ProvisionedStoreDto, StoreAdminParams, StoreListItemDto,
    StoreSearchParams, StoreWithOwnerDto,
};
use crate::api::rest::error::{ApiResult, OrProblem};
use crate::api::rest::extract::{ApiJson, ApiQuery, Authenticated};

#[tracing::instrument(skip_all, fields(user_id = %principal.id))]
pub async fn list_stores(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
    ApiQuery(params): ApiQuery<StoreSearchParams>,
) -> ApiResult<Json<Vec<StoreListItemDto>>> {
    let query = StoreSearchQuery::try_from(params).or_problem(&uri)?;
    let stores = svc
        .list_stores(principal.id, principal.role, &query)
        .await
        .or_problem(&uri)?;

    let show_own_rating = principal.role == Role::User;
    Ok(Json(
        stores
            .into_iter()
            .map(|item| StoreListItemDto {
                user_rating: show_own_rating.then(|| item.user_rating.map(|v| v.get())),
                store: item.store.into(),
            })
            .collect(),
    ))
}

#[tracing::instrument(skip_all, fields(admin_id = %principal.id))]
pub async fn list_stores_admin(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
    ApiQuery(params): ApiQuery<StoreAdminParams>,
) -> ApiResult<Json<Vec<StoreWithOwnerDto>>> {
    let query = StoreAdminQuery::try_from(params).or_problem(&uri)?;
    let stores = svc.list_stores_admin(&query).await.or_problem(&uri)?;
    Ok(Json(
        stores
            .into_iter()
            .map(|s| StoreWithOwnerDto {
                store: s.store.into(),
                owner: s.owner.map(Into::into),
            })
            .collect(),
    ))
}

#[tracing::instrument(skip_all, fields(admin_id = %principal.id))]
pub async fn create_store(
    uri: Uri,
    Extension(svc): Svc,
    Authenticated(principal): Authenticated,
    ApiJson(req): ApiJson<CreateStoreReq>,
) -> ApiResult<(StatusCode, Json<ProvisionedStoreDto>)> {
    let (store, owner) = req.into_parts();
    let provisioned = svc.provision_store(store, owner).await.or_problem(&uri)?;
    Ok((
        StatusCode::CREATED,
        Json(ProvisionedStoreDto {
            message: "Store and owner created successfully".to_owned(),
            owner: OwnerDto::from(&provisioned.owner),
            store: provisioned.store.into(),
        }),
    ))
}
