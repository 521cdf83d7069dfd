//! Input validation shared by registration, admin provisioning and rating submission.
//!
//! Every check runs before any write; a failed check maps to
//! [`DomainError::Validation`] naming the offending field.

use std::sync::LazyLock;

use regex::Regex;
use store_ratings_sdk::{RatingSubmission, RatingValue};
use uuid::Uuid;

use crate::config::ValidationLimits;
use crate::domain::error::DomainError;

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("static regex should not panic"));

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static PASSWORD_SPECIAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[!@#$%^&*]").expect("static regex should not panic"));

/// A rating submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRating {
    pub store_id: Uuid,
    pub value: RatingValue,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Validator {
    limits: ValidationLimits,
}

impl Validator {
    #[must_use]
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Person name: trimmed, within the configured user name bounds.
    pub fn user_name(&self, field: &str, raw: &str) -> Result<String, DomainError> {
        bounded(
            field,
            raw,
            self.limits.user_name_min,
            self.limits.user_name_max,
            "Name",
        )
    }

    pub fn store_name(&self, field: &str, raw: &str) -> Result<String, DomainError> {
        bounded(
            field,
            raw,
            self.limits.store_name_min,
            self.limits.store_name_max,
            "Store name",
        )
    }

    /// Returns the email trimmed and lower-cased, the form it is stored and looked up in.
    pub fn email(&self, field: &str, raw: &str) -> Result<String, DomainError> {
        let email = normalize_email(raw);
        if email.chars().count() > self.limits.email_max {
            return Err(DomainError::validation(
                field,
                format!("Email cannot exceed {} characters", self.limits.email_max),
            ));
        }
        if !EMAIL_REGEX.is_match(&email) {
            return Err(DomainError::validation(field, "Please enter a valid email"));
        }
        Ok(email)
    }

    pub fn password(&self, field: &str, password: &str) -> Result<(), DomainError> {
        let len = password.chars().count();
        if len < self.limits.password_min || len > self.limits.password_max {
            return Err(DomainError::validation(
                field,
                format!(
                    "Password must be {}-{} characters",
                    self.limits.password_min, self.limits.password_max
                ),
            ));
        }
        if !password.chars().any(|c| c.is_ascii_uppercase())
            || !PASSWORD_SPECIAL_REGEX.is_match(password)
        {
            return Err(DomainError::validation(
                field,
                "Password must contain at least one uppercase and one special character",
            ));
        }
        Ok(())
    }

    pub fn address(&self, field: &str, raw: &str) -> Result<String, DomainError> {
        let address = raw.trim();
        if address.chars().count() > self.limits.address_max {
            return Err(DomainError::validation(
                field,
                format!(
                    "Address cannot exceed {} characters",
                    self.limits.address_max
                ),
            ));
        }
        Ok(address.to_owned())
    }

    /// Store id present, rating a whole number in `1..=5`, comment within bounds.
    pub fn rating(&self, submission: RatingSubmission) -> Result<ValidRating, DomainError> {
        let store_id = submission
            .store_id
            .ok_or_else(|| DomainError::validation("storeId", "Store ID is required"))?;

        let value = submission
            .rating
            .and_then(RatingValue::from_f64)
            .ok_or_else(|| {
                DomainError::validation(
                    "rating",
                    "Rating must be a whole number between 1 and 5",
                )
            })?;

        let comment = submission
            .comment
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());
        if let Some(ref c) = comment {
            if c.chars().count() > self.limits.comment_max {
                return Err(DomainError::validation(
                    "comment",
                    format!(
                        "Comment cannot exceed {} characters",
                        self.limits.comment_max
                    ),
                ));
            }
        }

        Ok(ValidRating {
            store_id,
            value,
            comment,
        })
    }
}

#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn bounded(
    field: &str,
    raw: &str,
    min: usize,
    max: usize,
    label: &str,
) -> Result<String, DomainError> {
    let value = raw.trim();
    let len = value.chars().count();
    if len < min || len > max {
        return Err(DomainError::validation(
            field,
            format!("{label} must be {min}-{max} characters"),
        ));
    }
    Ok(value.to_owned())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(ValidationLimits::default())
    }

    fn field_of(err: &DomainError) -> &str {
        match err {
            DomainError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = validator().email("email", "  Alice@Example.COM ").unwrap();
        assert_eq!(email, "alice@example.com");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["", "alice", "alice@example", "al ice@example.com", "@."] {
            let err = validator().email("ownerEmail", bad).unwrap_err();
            assert_eq!(field_of(&err), "ownerEmail", "input {bad:?}");
        }
    }

    #[test]
    fn overlong_email_is_a_field_error() {
        let v = validator();
        let local = "a".repeat(250);
        assert!(v.email("email", &format!("{local}@x.io")).is_ok());

        let err = v.email("ownerEmail", &format!("a{local}@x.io")).unwrap_err();
        assert_eq!(field_of(&err), "ownerEmail");
        assert!(err.to_string().contains("255"));
    }

    #[test]
    fn password_policy() {
        let v = validator();
        assert!(v.password("password", "Secret#123").is_ok());
        assert!(v.password("password", "Sh#1").is_err());
        assert!(v.password("password", "Averyveryverylong#1").is_err());
        assert!(v.password("password", "nouppercase#1").is_err());
        assert!(v.password("password", "NoSpecial123").is_err());
    }

    #[test]
    fn user_name_bounds_count_characters() {
        let v = validator();
        assert!(v.user_name("name", "Short Name").is_err());
        assert!(v.user_name("name", "Alexandra Konstantinova").is_ok());
        assert!(v.user_name("name", &"x".repeat(61)).is_err());
        assert_eq!(
            v.user_name("name", "  Alexandra Konstantinova  ").unwrap(),
            "Alexandra Konstantinova"
        );
    }

    #[test]
    fn store_name_uses_store_bounds() {
        let v = validator();
        assert!(v.store_name("name", "Ab").is_err());
        assert!(v.store_name("name", "Abc").is_ok());
    }

    #[test]
    fn address_may_be_empty_but_not_too_long() {
        let v = validator();
        assert_eq!(v.address("address", "").unwrap(), "");
        assert!(v.address("address", &"a".repeat(401)).is_err());
    }

    #[test]
    fn rating_requires_store_id() {
        let err = validator()
            .rating(RatingSubmission {
                store_id: None,
                rating: Some(4.0),
                comment: None,
            })
            .unwrap_err();
        assert_eq!(field_of(&err), "storeId");
    }

    #[test]
    fn rating_rejects_fractional_and_out_of_range_values() {
        let v = validator();
        for bad in [Some(0.0), Some(6.0), Some(4.5), Some(-1.0), None] {
            let err = v
                .rating(RatingSubmission {
                    store_id: Some(Uuid::new_v4()),
                    rating: bad,
                    comment: None,
                })
                .unwrap_err();
            assert_eq!(field_of(&err), "rating", "input {bad:?}");
        }
    }

    #[test]
    fn rating_blank_comment_is_dropped() {
        let store_id = Uuid::new_v4();
        let valid = validator()
            .rating(RatingSubmission {
                store_id: Some(store_id),
                rating: Some(5.0),
                comment: Some("   ".to_owned()),
            })
            .unwrap();
        assert_eq!(valid.store_id, store_id);
        assert_eq!(valid.value.get(), 5);
        assert_eq!(valid.comment, None);
    }

    #[test]
    fn rating_comment_limit() {
        let err = validator()
            .rating(RatingSubmission {
                store_id: Some(Uuid::new_v4()),
                rating: Some(3.0),
                comment: Some("c".repeat(501)),
            })
            .unwrap_err();
        assert_eq!(field_of(&err), "comment");
    }
}
