//! Accounts: the admin and business-client identities stored in `app_users`.
//!
//! Values are validated on construction so services and adapters can rely on
//! the invariants documented on each type.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation failures for account primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("account id must be a valid UUID")]
    InvalidId,
    #[error("username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },
    #[error("username may only contain letters, digits, '.', '_' or '-'")]
    UsernameCharacters,
    #[error("business name must not be empty")]
    EmptyBusinessName,
    #[error("business name must be at most {max} characters")]
    BusinessNameTooLong { max: usize },
    #[error("call rate must be a non-negative amount with at most two decimal places")]
    InvalidCallRate,
    #[error("unknown role: {value}")]
    UnknownRole { value: String },
}

impl AccountValidationError {
    /// Request field the failure relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::UsernameLength { .. } | Self::UsernameCharacters => "username",
            Self::EmptyBusinessName | Self::BusinessNameTooLong { .. } => "businessName",
            Self::InvalidCallRate => "callRate",
            Self::UnknownRole { .. } => "role",
        }
    }

    /// Stable machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_uuid",
            Self::UsernameLength { .. } => "invalid_length",
            Self::UsernameCharacters => "invalid_characters",
            Self::EmptyBusinessName => "empty_business_name",
            Self::BusinessNameTooLong { .. } => "invalid_length",
            Self::InvalidCallRate => "invalid_call_rate",
            Self::UnknownRole { .. } => "unknown_role",
        }
    }
}

/// Stable account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Parse an identifier from its textual form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account role, stored as `user_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Business,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Business => "business",
        }
    }
}

impl FromStr for Role {
    type Err = AccountValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "business" => Ok(Self::Business),
            _ => Err(AccountValidationError::UnknownRole {
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 64;

/// Login name, unique across all accounts.
///
/// ## Invariants
/// - Trimmed, between 3 and 64 characters.
/// - ASCII letters, digits, `.`, `_` and `-` only.
///
/// # Examples
/// ```
/// use voice_orders::domain::Username;
///
/// let name = Username::new("  pizza.hut ").expect("valid");
/// assert_eq!(name.as_ref(), "pizza.hut");
/// assert!(Username::new("no spaces").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(AccountValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
        if !trimmed.chars().all(allowed) {
            return Err(AccountValidationError::UsernameCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const BUSINESS_NAME_MAX: usize = 120;

/// Trading name shown on receipts and in the admin listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BusinessName(String);

impl BusinessName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyBusinessName);
        }
        if trimmed.chars().count() > BUSINESS_NAME_MAX {
            return Err(AccountValidationError::BusinessNameTooLong {
                max: BUSINESS_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for BusinessName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Price of one billable call minute, held in paise.
///
/// # Examples
/// ```
/// use voice_orders::domain::CallRate;
///
/// let rate = CallRate::from_rupees(2.5).expect("valid rate");
/// assert_eq!(rate.paise(), 250);
/// assert_eq!(rate.charge_for(3), 750);
/// assert!(CallRate::from_rupees(1.005).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallRate(u32);

impl CallRate {
    /// Rate applied to new clients when none is given: ₹2.00 per minute.
    pub const DEFAULT: Self = Self(200);

    pub const fn from_paise(paise: u32) -> Self {
        Self(paise)
    }

    /// Convert a decimal rupee amount, rejecting sub-paisa precision.
    pub fn from_rupees(rupees: f64) -> Result<Self, AccountValidationError> {
        if !rupees.is_finite() || rupees < 0.0 {
            return Err(AccountValidationError::InvalidCallRate);
        }
        let scaled = rupees * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 || rounded > f64::from(u32::MAX) {
            return Err(AccountValidationError::InvalidCallRate);
        }
        Ok(Self(rounded as u32))
    }

    pub const fn paise(self) -> u32 {
        self.0
    }

    pub fn rupees(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Charge in paise for the given number of billable minutes.
    pub fn charge_for(self, minutes: u64) -> u64 {
        minutes.saturating_mul(u64::from(self.0))
    }
}

impl Default for CallRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Stored bcrypt hash. Never serialised and redacted from debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// A persisted account.
///
/// Business accounts always carry a business name; admin accounts may not.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub role: Role,
    pub business_name: Option<BusinessName>,
    pub call_rate: CallRate,
    pub auto_print: bool,
    pub is_active: bool,
    pub logo_url: Option<String>,
    pub webhook_url: Option<String>,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build an active admin account.
    pub fn admin(username: Username, password_hash: PasswordHash, created_at: DateTime<Utc>) -> Self {
        Self {
            id: AccountId::random(),
            username,
            role: Role::Admin,
            business_name: None,
            call_rate: CallRate::from_paise(0),
            auto_print: false,
            is_active: true,
            logo_url: None,
            webhook_url: None,
            password_hash,
            created_at,
        }
    }

    pub fn is_business(&self) -> bool {
        self.role == Role::Business
    }

    /// Business accounts may be switched off by an admin; admins are always usable.
    pub fn can_sign_in(&self) -> bool {
        !self.is_business() || self.is_active
    }

    /// Name shown in the dashboard header.
    pub fn display_name(&self) -> &str {
        self.business_name
            .as_ref()
            .map_or(self.username.as_ref(), AsRef::as_ref)
    }
}
