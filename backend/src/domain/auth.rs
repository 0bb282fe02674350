//! Login credentials and the signed-in principal.
//!
//! Credentials are validated for shape only; whether they match an account is
//! decided by the [`LoginService`](crate::domain::ports::LoginService).

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::{Account, AccountId, Role};

/// Shape errors for login payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Username, password and the panel the user is signing in to.
///
/// The password is zeroed on drop and keeps caller whitespace.
///
/// # Examples
/// ```
/// use voice_orders::domain::{LoginCredentials, Role};
///
/// let creds = LoginCredentials::try_from_parts(" owner ", "pw", Role::Business).unwrap();
/// assert_eq!(creds.username(), "owner");
/// assert_eq!(creds.role(), Role::Business);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
    role: Role,
}

impl LoginCredentials {
    pub fn try_from_parts(
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            role,
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// The authenticated account as seen by handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    #[schema(value_type = String, format = Uuid)]
    pub account_id: AccountId,
    pub username: String,
    pub role: Role,
    pub business_name: Option<String>,
    pub is_active: bool,
}

impl From<&Account> for Principal {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            username: account.username.to_string(),
            role: account.role,
            business_name: account
                .business_name
                .as_ref()
                .map(|name| name.as_ref().to_owned()),
            is_active: account.is_active,
        }
    }
}
