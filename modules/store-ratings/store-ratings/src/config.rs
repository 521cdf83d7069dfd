use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Configuration for the store-ratings module.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreRatingsConfig {
    #[serde(flatten)]
    pub limits: ValidationLimits,
    #[serde(default)]
    pub password_hash: PasswordHashConfig,
}

/// Input limits applied by the domain validator. Lengths are counted in characters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub user_name_min: usize,
    pub user_name_max: usize,
    pub store_name_min: usize,
    pub store_name_max: usize,
    pub email_max: usize,
    pub address_max: usize,
    pub password_min: usize,
    pub password_max: usize,
    pub comment_max: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            user_name_min: 20,
            user_name_max: 60,
            store_name_min: 3,
            store_name_max: 60,
            email_max: EMAIL_COLUMN_WIDTH,
            address_max: 400,
            password_min: 8,
            password_max: 16,
            comment_max: 500,
        }
    }
}

// Widths of the bounded text columns in the initial migration.
pub(crate) const USER_NAME_COLUMN_WIDTH: usize = 60;
pub(crate) const STORE_NAME_COLUMN_WIDTH: usize = 60;
pub(crate) const EMAIL_COLUMN_WIDTH: usize = 255;
pub(crate) const ADDRESS_COLUMN_WIDTH: usize = 400;
pub(crate) const COMMENT_COLUMN_WIDTH: usize = 500;

impl ValidationLimits {
    /// Reject maxima wider than the columns the values are stored in; such a
    /// value would pass validation and then fail the insert.
    ///
    /// # Errors
    /// Names the first limit that exceeds its column.
    pub fn check_column_widths(&self) -> anyhow::Result<()> {
        let checks = [
            ("user_name_max", self.user_name_max, USER_NAME_COLUMN_WIDTH),
            ("store_name_max", self.store_name_max, STORE_NAME_COLUMN_WIDTH),
            ("email_max", self.email_max, EMAIL_COLUMN_WIDTH),
            ("address_max", self.address_max, ADDRESS_COLUMN_WIDTH),
            ("comment_max", self.comment_max, COMMENT_COLUMN_WIDTH),
        ];
        for (name, configured, width) in checks {
            anyhow::ensure!(
                configured <= width,
                "{name} = {configured} exceeds the column width of {width}"
            );
        }
        Ok(())
    }
}

/// Argon2id cost parameters. Defaults match the `argon2` crate defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

/// Bearer token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens.
    #[serde(serialize_with = "redact_secret", default = "empty_secret")]
    pub jwt_secret: SecretString,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: empty_secret(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

// 7 days
fn default_token_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn redact_secret<S>(_secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str("***")
}
