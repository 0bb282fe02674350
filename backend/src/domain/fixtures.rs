//! Shared builders for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::json;

use crate::domain::{
    Account, AccountId, BusinessName, CallRate, Order, OrderId, OrderStatus, PasswordHash, Role,
    Username,
};

/// 2026-04-10T15:00:00Z.
pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 10, 15, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_now(),
    })
}

pub(crate) fn business_account(username: &str) -> Account {
    Account {
        id: AccountId::random(),
        username: Username::new(username).expect("valid username"),
        role: Role::Business,
        business_name: Some(BusinessName::new(format!("{username} kitchen")).expect("valid name")),
        call_rate: CallRate::DEFAULT,
        auto_print: true,
        is_active: true,
        logo_url: None,
        webhook_url: None,
        password_hash: PasswordHash::new("$2b$10$fixture"),
        created_at: fixture_now(),
    }
}

pub(crate) fn order_for(business_id: AccountId, status: OrderStatus) -> Order {
    Order {
        id: OrderId::random(),
        business_id,
        caller_number: "+919800000000".to_owned(),
        caller_name: "Asha".to_owned(),
        order_details: "2 masala dosa".to_owned(),
        quantity: 2,
        call_duration_secs: 95,
        call_status: "completed".to_owned(),
        transcript: String::new(),
        status,
        webhook_payload: json!({}),
        created_at: fixture_now(),
        updated_at: fixture_now(),
    }
}
