//! Error catalog of the store-ratings REST API.
//!
//! Each [`ErrorCode`] resolves to a static [`ErrDef`] carrying the HTTP status,
//! title, stable machine code and problem type URL.

use http::StatusCode;

use crate::api::rest::problem::Problem;

const TYPE_BASE: &str = "https://errors.store-ratings.dev/";

/// Static error definition from the catalog.
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_path: &'static str,
}

impl ErrDef {
    /// Convert this error definition into a Problem with the given detail.
    #[inline]
    pub fn as_problem(&self, detail: impl Into<String>) -> Problem {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Problem::new(status, self.title, detail.into())
            .with_code(self.code)
            .with_type(format!("{TYPE_BASE}{}", self.type_path))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Validation,
    EmailConflict,
    InvalidCredentials,
    Unauthenticated,
    Forbidden,
    UserNotFound,
    StoreNotFound,
    RatingNotFound,
    OwnerHasNoStore,
    InternalDatabase,
    Internal,
}

impl ErrorCode {
    #[must_use]
    pub const fn def(self) -> ErrDef {
        match self {
            Self::Validation => ErrDef {
                status: 400,
                title: "Validation Failed",
                code: "STORE_RATINGS_VALIDATION",
                type_path: "validation",
            },
            Self::EmailConflict => ErrDef {
                status: 409,
                title: "Email Already Registered",
                code: "STORE_RATINGS_EMAIL_CONFLICT",
                type_path: "email-conflict",
            },
            Self::InvalidCredentials => ErrDef {
                status: 400,
                title: "Invalid Credentials",
                code: "STORE_RATINGS_INVALID_CREDENTIALS",
                type_path: "invalid-credentials",
            },
            Self::Unauthenticated => ErrDef {
                status: 401,
                title: "Unauthorized",
                code: "STORE_RATINGS_UNAUTHENTICATED",
                type_path: "unauthenticated",
            },
            Self::Forbidden => ErrDef {
                status: 403,
                title: "Forbidden",
                code: "STORE_RATINGS_FORBIDDEN",
                type_path: "forbidden",
            },
            Self::UserNotFound => ErrDef {
                status: 404,
                title: "User Not Found",
                code: "STORE_RATINGS_USER_NOT_FOUND",
                type_path: "user-not-found",
            },
            Self::StoreNotFound => ErrDef {
                status: 404,
                title: "Store Not Found",
                code: "STORE_RATINGS_STORE_NOT_FOUND",
                type_path: "store-not-found",
            },
            Self::RatingNotFound => ErrDef {
                status: 404,
                title: "Rating Not Found",
                code: "STORE_RATINGS_RATING_NOT_FOUND",
                type_path: "rating-not-found",
            },
            Self::OwnerHasNoStore => ErrDef {
                status: 404,
                title: "Store Not Found",
                code: "STORE_RATINGS_OWNER_HAS_NO_STORE",
                type_path: "owner-has-no-store",
            },
            Self::InternalDatabase => ErrDef {
                status: 500,
                title: "Internal Server Error",
                code: "STORE_RATINGS_INTERNAL_DATABASE",
                type_path: "internal-database",
            },
            Self::Internal => ErrDef {
                status: 500,
                title: "Internal Server Error",
                code: "STORE_RATINGS_INTERNAL",
                type_path: "internal",
            },
        }
    }

    pub fn as_problem(self, detail: impl Into<String>) -> Problem {
        self.def().as_problem(detail)
    }

    /// Create a Problem with `instance` and optional `trace_id` context.
    pub fn with_context(
        self,
        detail: impl Into<String>,
        instance: &str,
        trace_id: Option<String>,
    ) -> Problem {
        let mut p = self.as_problem(detail).with_instance(instance);
        if let Some(tid) = trace_id {
            p = p.with_trace_id(tid);
        }
        p
    }
}
