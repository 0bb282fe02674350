//! Business-client management values used by the admin panel.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;
use zeroize::Zeroizing;

use super::{Account, AccountValidationError, BusinessName, CallRate, Username};

pub const PASSWORD_MIN_LEN: usize = 6;

/// Validation failures for client create/update requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientValidationError {
    #[error(transparent)]
    Account(#[from] AccountValidationError),
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("{field} must be an absolute http(s) URL")]
    InvalidUrl { field: &'static str },
}

impl ClientValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Account(inner) => inner.field(),
            Self::PasswordTooShort { .. } => "password",
            Self::InvalidUrl { field } => field,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Account(inner) => inner.code(),
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::InvalidUrl { .. } => "invalid_url",
        }
    }
}

fn validate_password(raw: &str) -> Result<Zeroizing<String>, ClientValidationError> {
    if raw.chars().count() < PASSWORD_MIN_LEN {
        return Err(ClientValidationError::PasswordTooShort {
            min: PASSWORD_MIN_LEN,
        });
    }
    Ok(Zeroizing::new(raw.to_owned()))
}

/// Blank strings clear the value; anything else must parse as an http(s) URL.
fn validate_url(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<String>, ClientValidationError> {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Some(url.to_string())),
        _ => Err(ClientValidationError::InvalidUrl { field }),
    }
}

/// Raw, unvalidated input for a new business client.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientDraft<'a> {
    pub username: &'a str,
    pub business_name: &'a str,
    pub password: &'a str,
    pub call_rate: Option<f64>,
    pub auto_print: Option<bool>,
    pub logo_url: Option<&'a str>,
    pub webhook_url: Option<&'a str>,
}

/// Validated request to create a business client.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub username: Username,
    pub business_name: BusinessName,
    pub call_rate: CallRate,
    pub auto_print: bool,
    pub logo_url: Option<String>,
    pub webhook_url: Option<String>,
    password: Zeroizing<String>,
}

impl NewClient {
    /// Validate a draft. Call rate defaults to ₹2.00 and auto print to on.
    ///
    /// # Examples
    /// ```
    /// use voice_orders::domain::{ClientDraft, NewClient};
    ///
    /// let client = NewClient::try_from_draft(ClientDraft {
    ///     username: "spice",
    ///     business_name: "Spice Route",
    ///     password: "s3cret!",
    ///     ..ClientDraft::default()
    /// })
    /// .expect("valid draft");
    /// assert_eq!(client.call_rate.paise(), 200);
    /// assert!(client.auto_print);
    /// ```
    pub fn try_from_draft(draft: ClientDraft<'_>) -> Result<Self, ClientValidationError> {
        let username = Username::new(draft.username)?;
        let business_name = BusinessName::new(draft.business_name)?;
        let password = validate_password(draft.password)?;
        let call_rate = draft
            .call_rate
            .map(CallRate::from_rupees)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            username,
            business_name,
            call_rate,
            auto_print: draft.auto_print.unwrap_or(true),
            logo_url: validate_url(draft.logo_url, "logoUrl")?,
            webhook_url: validate_url(draft.webhook_url, "webhookUrl")?,
            password,
        })
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Raw, unvalidated partial update.
///
/// For the URL fields `Some("")` clears the stored value and `None` keeps it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientPatch<'a> {
    pub business_name: Option<&'a str>,
    pub call_rate: Option<f64>,
    pub auto_print: Option<bool>,
    pub is_active: Option<bool>,
    pub logo_url: Option<&'a str>,
    pub webhook_url: Option<&'a str>,
    pub password: Option<&'a str>,
}

/// Validated partial update of a business client.
#[derive(Debug, Clone, Default)]
pub struct ClientUpdate {
    pub business_name: Option<BusinessName>,
    pub call_rate: Option<CallRate>,
    pub auto_print: Option<bool>,
    pub is_active: Option<bool>,
    pub logo_url: Option<Option<String>>,
    pub webhook_url: Option<Option<String>>,
    password: Option<Zeroizing<String>>,
}

impl ClientUpdate {
    pub fn try_from_patch(patch: ClientPatch<'_>) -> Result<Self, ClientValidationError> {
        Ok(Self {
            business_name: patch.business_name.map(BusinessName::new).transpose()?,
            call_rate: patch.call_rate.map(CallRate::from_rupees).transpose()?,
            auto_print: patch.auto_print,
            is_active: patch.is_active,
            logo_url: patch
                .logo_url
                .map(|raw| validate_url(Some(raw), "logoUrl"))
                .transpose()?,
            webhook_url: patch
                .webhook_url
                .map(|raw| validate_url(Some(raw), "webhookUrl"))
                .transpose()?,
            password: patch.password.map(validate_password).transpose()?,
        })
    }

    /// New password to hash, if the update resets it.
    pub fn password(&self) -> Option<&str> {
        self.password.as_ref().map(|p| p.as_str())
    }

    /// Copy every provided profile field onto `account`.
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(name) = &self.business_name {
            account.business_name = Some(name.clone());
        }
        if let Some(rate) = self.call_rate {
            account.call_rate = rate;
        }
        if let Some(auto_print) = self.auto_print {
            account.auto_print = auto_print;
        }
        if let Some(is_active) = self.is_active {
            account.is_active = is_active;
        }
        if let Some(logo_url) = &self.logo_url {
            account.logo_url.clone_from(logo_url);
        }
        if let Some(webhook_url) = &self.webhook_url {
            account.webhook_url.clone_from(webhook_url);
        }
    }
}

/// Row of the admin client listing, with call totals.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    #[schema(value_type = String, format = Uuid)]
    pub id: super::AccountId,
    pub username: String,
    pub business_name: String,
    /// Rupees per billable minute.
    pub call_rate: f64,
    pub call_rate_paise: u32,
    pub auto_print: bool,
    pub is_active: bool,
    pub logo_url: Option<String>,
    pub webhook_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub total_calls: u64,
    pub total_minutes: u64,
    pub total_revenue_paise: u64,
}

impl ClientSummary {
    pub fn new(account: &Account, total_calls: u64, total_minutes: u64) -> Self {
        Self {
            id: account.id,
            username: account.username.to_string(),
            business_name: account.display_name().to_owned(),
            call_rate: account.call_rate.rupees(),
            call_rate_paise: account.call_rate.paise(),
            auto_print: account.auto_print,
            is_active: account.is_active,
            logo_url: account.logo_url.clone(),
            webhook_url: account.webhook_url.clone(),
            created_at: account.created_at,
            total_calls,
            total_minutes,
            total_revenue_paise: account.call_rate.charge_for(total_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, PasswordHash, Role};
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> ClientDraft<'static> {
        ClientDraft {
            username: "spice",
            business_name: "Spice Route",
            password: "s3cret!",
            ..ClientDraft::default()
        }
    }

    #[fixture]
    fn business() -> Account {
        Account {
            id: AccountId::random(),
            username: Username::new("spice").expect("valid"),
            role: Role::Business,
            business_name: Some(BusinessName::new("Spice Route").expect("valid")),
            call_rate: CallRate::DEFAULT,
            auto_print: true,
            is_active: true,
            logo_url: Some("https://cdn.example/logo.png".to_owned()),
            webhook_url: None,
            password_hash: PasswordHash::new("hash"),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn short_password_is_rejected(draft: ClientDraft<'static>) {
        let err = NewClient::try_from_draft(ClientDraft {
            password: "abc",
            ..draft
        })
        .expect_err("short password");
        assert_eq!(err.field(), "password");
        assert_eq!(err.code(), "password_too_short");
    }

    #[rstest]
    #[case(Some("ftp://files.example/logo.png"), true)]
    #[case(Some("not a url"), true)]
    #[case(Some("https://cdn.example/logo.png"), false)]
    #[case(Some("   "), false)]
    #[case(None, false)]
    fn logo_url_must_be_http(
        draft: ClientDraft<'static>,
        #[case] logo_url: Option<&'static str>,
        #[case] rejected: bool,
    ) {
        let result = NewClient::try_from_draft(ClientDraft { logo_url, ..draft });
        assert_eq!(result.is_err(), rejected);
    }

    #[rstest]
    fn invalid_call_rate_reports_field(draft: ClientDraft<'static>) {
        let err = NewClient::try_from_draft(ClientDraft {
            call_rate: Some(-2.0),
            ..draft
        })
        .expect_err("negative rate");
        assert_eq!(err.field(), "callRate");
    }

    #[rstest]
    fn update_applies_only_provided_fields(mut business: Account) {
        let update = ClientUpdate::try_from_patch(ClientPatch {
            is_active: Some(false),
            logo_url: Some(""),
            call_rate: Some(3.5),
            ..ClientPatch::default()
        })
        .expect("valid patch");
        update.apply_to(&mut business);

        assert!(!business.is_active);
        assert_eq!(business.logo_url, None);
        assert_eq!(business.call_rate.paise(), 350);
        assert!(business.auto_print);
        assert!(update.password().is_none());
    }

    #[rstest]
    fn summary_prices_minutes_at_call_rate(business: Account) {
        let summary = ClientSummary::new(&business, 4, 7);
        assert_eq!(summary.total_calls, 4);
        assert_eq!(summary.total_revenue_paise, 1400);
        assert_eq!(summary.business_name, "Spice Route");
    }
}
