//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure is a `400 invalid_request` whose `details` carry
//! the offending `field` and a machine-readable `code`.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{AccountId, ClientValidationError, Error, OrderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidTimestamp,
    InvalidRange,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidRange => "invalid_range",
        }
    }
}

/// Request field name as clients spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

/// `400` with `{field, code}` details.
pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

fn field_value_error(field: FieldName, code: ValidationCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field.as_str(),
        ValidationCode::MissingField.as_str(),
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn invalid_range_error(field: FieldName, message: impl Into<String>) -> Error {
    field_error(field.as_str(), ValidationCode::InvalidRange.as_str(), message)
}

fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    field_value_error(
        field,
        ValidationCode::InvalidUuid,
        format!("{} must be a valid UUID", field.as_str()),
        value,
    )
}

pub(crate) fn parse_account_id(value: &str, field: FieldName) -> Result<AccountId, Error> {
    AccountId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_order_id(value: &str, field: FieldName) -> Result<OrderId, Error> {
    OrderId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| Some(timestamp.with_timezone(&Utc)))
        .map_err(|_| {
            field_value_error(
                field,
                ValidationCode::InvalidTimestamp,
                format!("{} must be an RFC 3339 timestamp", field.as_str()),
                raw,
            )
        })
}

pub(crate) fn client_validation_error(err: ClientValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}
