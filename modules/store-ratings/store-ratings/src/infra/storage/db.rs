//! Database helpers: error conversion, case-insensitive filters, sort order.

use std::fmt::Display;

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{DbErr, Order, SqlErr};
use store_ratings_sdk::SortOrder;

use crate::domain::error::DomainError;

/// Convert any displayable error into a `DomainError::Database`.
pub fn db_err(e: impl Display) -> DomainError {
    tracing::error!(error = %e, "Database operation failed");
    DomainError::database(e.to_string())
}

/// Whether the error is a unique index violation, on any supported backend.
pub fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// SQL `LIKE` pattern matching `needle` anywhere, lower-cased for use against `LOWER(col)`.
/// `%`, `_` and `\` are escaped with `\`.
pub fn like_contains(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.to_lowercase().chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out.push('%');
    out
}

/// Case-insensitive substring match of `col` against `needle`.
pub fn contains_ci<T: IntoColumnRef>(col: T, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(like_contains(needle)).escape('\\'))
}

/// Trimmed, non-empty filter value.
pub fn filter_value(raw: Option<&String>) -> Option<&str> {
    raw.map(|s| s.trim()).filter(|s| !s.is_empty())
}

pub fn order(sort_order: SortOrder) -> Order {
    match sort_order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}
