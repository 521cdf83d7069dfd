//! REST handlers. Each one extracts, calls the domain service and maps the
//! result to a DTO; no business rules live here.

use std::sync::Arc;

use axum::Extension;

use crate::api::rest::routes::ConcreteService;

pub mod auth;
pub mod ratings;
pub mod stores;
pub mod users;

pub(crate) type Svc = Extension<Arc<ConcreteService>>;
