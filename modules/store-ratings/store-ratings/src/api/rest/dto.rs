//! REST DTOs. All JSON field names are camelCase.

use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};
use store_ratings_sdk::{
    AuthSession, DashboardStats, NewStore, NewStoreOwner, NewUser, OwnerSummary, RaterSummary,
    Rating, RatingSubmission, RatingWithRater, Role, Store, StoreAdminQuery, StoreRatingsReport,
    StoreSearchQuery, StoreSummary, User, UserListQuery, UserWithStore,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;

// ==================== Responses ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: Role,
    pub store_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSessionDto {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeDto {
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub total_users: u64,
    pub total_stores: u64,
    pub total_ratings: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithStoreDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub store: Option<StoreSummaryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Uuid,
    pub average_rating: f64,
    pub total_ratings: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Store as seen in the browsing list. `userRating` is present only for end
/// users, and `null` when they have not rated the store yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreListItemDto {
    #[serde(flatten)]
    pub store: StoreDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<Option<u8>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreWithOwnerDto {
    #[serde(flatten)]
    pub store: StoreDto,
    pub owner: Option<OwnerDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedStoreDto {
    pub message: String,
    pub store: StoreDto,
    pub owner: OwnerDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRatingResp {
    pub message: String,
    pub rating: RatingDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaterDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingWithRaterDto {
    #[serde(flatten)]
    pub rating: RatingDto,
    pub user: Option<RaterDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRatingsDto {
    pub store_id: Uuid,
    pub ratings: Vec<RatingWithRaterDto>,
    pub average_rating: f64,
    pub total_ratings: u32,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            address: u.address,
            role: u.role,
            store_id: u.store_id,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl From<AuthSession> for AuthSessionDto {
    fn from(s: AuthSession) -> Self {
        Self {
            token: s.token,
            user: s.user.into(),
        }
    }
}

impl From<DashboardStats> for DashboardDto {
    fn from(s: DashboardStats) -> Self {
        Self {
            total_users: s.total_users,
            total_stores: s.total_stores,
            total_ratings: s.total_ratings,
        }
    }
}

impl From<StoreSummary> for StoreSummaryDto {
    fn from(s: StoreSummary) -> Self {
        Self {
            id: s.id,
            name: s.name,
            average_rating: s.average_rating,
        }
    }
}

impl From<UserWithStore> for UserWithStoreDto {
    fn from(u: UserWithStore) -> Self {
        Self {
            user: u.user.into(),
            store: u.store.map(Into::into),
        }
    }
}

impl From<Store> for StoreDto {
    fn from(s: Store) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            address: s.address,
            owner_id: s.owner_id,
            average_rating: s.average_rating,
            total_ratings: s.total_ratings,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

impl From<OwnerSummary> for OwnerDto {
    fn from(o: OwnerSummary) -> Self {
        Self {
            id: o.id,
            name: o.name,
            email: o.email,
        }
    }
}

impl From<&User> for OwnerDto {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
        }
    }
}

impl From<Rating> for RatingDto {
    fn from(r: Rating) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            store_id: r.store_id,
            rating: r.value.get(),
            comment: r.comment,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<RaterSummary> for RaterDto {
    fn from(r: RaterSummary) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            address: r.address,
        }
    }
}

impl From<RatingWithRater> for RatingWithRaterDto {
    fn from(r: RatingWithRater) -> Self {
        Self {
            rating: r.rating.into(),
            user: r.rater.map(Into::into),
        }
    }
}

impl From<StoreRatingsReport> for StoreRatingsDto {
    fn from(r: StoreRatingsReport) -> Self {
        Self {
            store_id: r.store_id,
            ratings: r.ratings.into_iter().map(Into::into).collect(),
            average_rating: r.average_rating,
            total_ratings: r.total_ratings,
        }
    }
}

// ==================== Requests ====================
//
// String fields default to empty so a missing field reaches the domain
// validator and is reported against its name.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterReq {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordReq {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserReq {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub role: String,
    pub store_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateStoreReq {
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_password: String,
    pub owner_address: String,
}

/// `rating` is kept as raw JSON so a string or fraction is reported as a
/// field violation rather than a body parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitRatingReq {
    pub store_id: Option<String>,
    pub rating: Option<serde_json::Value>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreSearchParams {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreAdminParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserListParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Parse an optional query/body token into one of the SDK's closed enums,
/// falling back to the enum default when absent or blank.
fn parse_token<T>(field: &str, raw: Option<&str>) -> Result<T, DomainError>
where
    T: DeserializeOwned + Default,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(T::default()),
        Some(s) => {
            let de: StrDeserializer<'_, ValueError> = s.into_deserializer();
            T::deserialize(de)
                .map_err(|_| DomainError::validation(field, format!("Unsupported value '{s}'")))
        }
    }
}

fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| DomainError::validation(field, "Must be a valid identifier"))
}

impl From<RegisterReq> for NewUser {
    fn from(req: RegisterReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            address: req.address,
            role: Role::User,
            store_id: None,
        }
    }
}

impl TryFrom<CreateUserReq> for NewUser {
    type Error = DomainError;

    fn try_from(req: CreateUserReq) -> Result<Self, Self::Error> {
        let role: Role = req
            .role
            .trim()
            .parse()
            .map_err(|e: store_ratings_sdk::RoleParseError| {
                DomainError::validation("role", e.to_string())
            })?;
        let store_id = req
            .store_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| parse_uuid("storeId", s))
            .transpose()?;

        Ok(Self {
            name: req.name,
            email: req.email,
            password: req.password,
            address: req.address,
            role,
            store_id,
        })
    }
}

impl CreateStoreReq {
    #[must_use]
    pub fn into_parts(self) -> (NewStore, NewStoreOwner) {
        (
            NewStore {
                name: self.name,
                email: self.email,
                address: self.address,
            },
            NewStoreOwner {
                name: self.owner_name,
                email: self.owner_email,
                password: self.owner_password,
                address: self.owner_address,
            },
        )
    }
}

impl TryFrom<SubmitRatingReq> for RatingSubmission {
    type Error = DomainError;

    fn try_from(req: SubmitRatingReq) -> Result<Self, Self::Error> {
        let store_id = req
            .store_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| parse_uuid("storeId", s))
            .transpose()?;

        Ok(Self {
            store_id,
            rating: req.rating.as_ref().and_then(serde_json::Value::as_f64),
            comment: req.comment,
        })
    }
}

impl TryFrom<StoreSearchParams> for StoreSearchQuery {
    type Error = DomainError;

    fn try_from(p: StoreSearchParams) -> Result<Self, Self::Error> {
        Ok(Self {
            search: p.search,
            sort_by: parse_token("sortBy", p.sort_by.as_deref())?,
            sort_order: parse_token("sortOrder", p.sort_order.as_deref())?,
        })
    }
}

impl TryFrom<StoreAdminParams> for StoreAdminQuery {
    type Error = DomainError;

    fn try_from(p: StoreAdminParams) -> Result<Self, Self::Error> {
        Ok(Self {
            name: p.name,
            email: p.email,
            address: p.address,
            sort_by: parse_token("sortBy", p.sort_by.as_deref())?,
            sort_order: parse_token("sortOrder", p.sort_order.as_deref())?,
        })
    }
}

impl TryFrom<UserListParams> for UserListQuery {
    type Error = DomainError;

    fn try_from(p: UserListParams) -> Result<Self, Self::Error> {
        Ok(Self {
            name: p.name,
            email: p.email,
            address: p.address,
            role: parse_token("role", p.role.as_deref())?,
            sort_by: parse_token("sortBy", p.sort_by.as_deref())?,
            sort_order: parse_token("sortOrder", p.sort_order.as_deref())?,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use store_ratings_sdk::{RoleFilter, SortOrder, StoreSortField};

    #[test]
    fn sort_tokens_parse_into_closed_enums() {
        let q = StoreSearchQuery::try_from(StoreSearchParams {
            search: None,
            sort_by: Some("averageRating".to_owned()),
            sort_order: Some("desc".to_owned()),
        })
        .unwrap();
        assert_eq!(q.sort_by, StoreSortField::AverageRating);
        assert_eq!(q.sort_order, SortOrder::Desc);
    }

    #[test]
    fn unknown_sort_column_is_a_field_violation() {
        let err = StoreSearchQuery::try_from(StoreSearchParams {
            sort_by: Some("password_hash".to_owned()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "sortBy"));
    }

    #[test]
    fn role_filter_defaults_to_all() {
        let q = UserListQuery::try_from(UserListParams::default()).unwrap();
        assert_eq!(q.role, RoleFilter::All);
        let q = UserListQuery::try_from(UserListParams {
            role: Some("storeOwner".to_owned()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(q.role, RoleFilter::StoreOwner);
    }

    #[test]
    fn non_numeric_rating_becomes_missing() {
        let req: SubmitRatingReq =
            serde_json::from_str(r#"{"storeId":"0190d7f4-0000-7000-8000-000000000001","rating":"5"}"#)
                .unwrap();
        let sub = RatingSubmission::try_from(req).unwrap();
        assert!(sub.store_id.is_some());
        assert_eq!(sub.rating, None);
    }

    #[test]
    fn malformed_store_id_is_a_field_violation() {
        let err = RatingSubmission::try_from(SubmitRatingReq {
            store_id: Some("nope".to_owned()),
            rating: Some(serde_json::json!(4)),
            comment: None,
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "storeId"));
    }

    #[test]
    fn create_user_rejects_unknown_role() {
        let err = NewUser::try_from(CreateUserReq {
            role: "superuser".to_owned(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "role"));
    }

    #[test]
    fn user_dto_is_camel_case() {
        let now = OffsetDateTime::now_utc();
        let dto = UserDto::from(User {
            id: Uuid::nil(),
            name: "n".to_owned(),
            email: "e@x.io".to_owned(),
            address: String::new(),
            role: Role::StoreOwner,
            store_id: None,
            created_at: now,
            updated_at: now,
        });
        let json = serde_json::to_value(dto).unwrap();
        assert_eq!(json["role"], "storeOwner");
        assert!(json.get("storeId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn user_rating_is_omitted_or_null() {
        let now = OffsetDateTime::now_utc();
        let store = StoreDto {
            id: Uuid::nil(),
            name: "S".to_owned(),
            email: "s@x.io".to_owned(),
            address: String::new(),
            owner_id: Uuid::nil(),
            average_rating: 0.0,
            total_ratings: 0,
            created_at: now,
            updated_at: now,
        };
        let hidden = StoreListItemDto {
            store: store.clone(),
            user_rating: None,
        };
        let unrated = StoreListItemDto {
            store,
            user_rating: Some(None),
        };
        assert!(serde_json::to_value(hidden).unwrap().get("userRating").is_none());
        assert!(serde_json::to_value(unrated).unwrap()["userRating"].is_null());
    }
}
