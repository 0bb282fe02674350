//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it; repositories convert them to domain types at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{app_users, orders, print_settings};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Row struct for reading from the app_users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = app_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub user_type: String,
    pub business_name: Option<String>,
    pub call_rate_paise: i32,
    pub auto_print: bool,
    pub is_active: bool,
    pub logo_url: Option<String>,
    pub webhook_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = app_users)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub user_type: &'a str,
    pub business_name: Option<&'a str>,
    pub call_rate_paise: i32,
    pub auto_print: bool,
    pub is_active: bool,
    pub logo_url: Option<&'a str>,
    pub webhook_url: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Changeset for the mutable account columns.
///
/// `treat_none_as_null` so clearing a URL writes NULL instead of skipping it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = app_users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AccountUpdate<'a> {
    pub password_hash: &'a str,
    pub business_name: Option<&'a str>,
    pub call_rate_paise: i32,
    pub auto_print: bool,
    pub is_active: bool,
    pub logo_url: Option<&'a str>,
    pub webhook_url: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub caller_number: String,
    pub caller_name: String,
    pub order_details: String,
    pub quantity: i32,
    pub call_duration_secs: i32,
    pub call_status: String,
    pub transcript: String,
    pub status: String,
    pub webhook_payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub business_id: Uuid,
    pub caller_number: &'a str,
    pub caller_name: &'a str,
    pub order_details: &'a str,
    pub quantity: i32,
    pub call_duration_secs: i32,
    pub call_status: &'a str,
    pub transcript: &'a str,
    pub status: &'a str,
    pub webhook_payload: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Print settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = print_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PrintSettingsRow {
    pub printer_type: String,
    pub paper_size: String,
    pub include_timestamp: bool,
    pub include_customer_info: bool,
    pub include_business_logo: bool,
    pub print_copies: i16,
}

/// Inserted as-is; on conflict the `excluded` values replace the row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = print_settings)]
pub(crate) struct PrintSettingsRecord<'a> {
    pub business_id: Uuid,
    pub printer_type: &'a str,
    pub paper_size: &'a str,
    pub include_timestamp: bool,
    pub include_customer_info: bool,
    pub include_business_logo: bool,
    pub print_copies: i16,
    pub updated_at: DateTime<Utc>,
}
