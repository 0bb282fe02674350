//! Call/order records and their lifecycle.
//!
//! Each accepted call event becomes one [`Order`] owned by a business
//! account. Status moves `new → printed → completed` and every transition is
//! persisted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::AccountId;

/// Stable order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw.as_ref()).map(Self)
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    New,
    Printed,
    Completed,
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} an order that is {from}")]
pub struct OrderTransitionError {
    pub from: OrderStatus,
    pub action: &'static str,
}

impl OrderStatus {
    /// Statuses shown on the live board.
    pub const ACTIVE: [Self; 2] = [Self::New, Self::Printed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Printed => "printed",
            Self::Completed => "completed",
        }
    }

    /// Orders still shown on the live board.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::New | Self::Printed)
    }

    /// Printing is allowed until the order is completed; reprints keep `printed`.
    pub fn print(self) -> Result<Self, OrderTransitionError> {
        match self {
            Self::New | Self::Printed => Ok(Self::Printed),
            Self::Completed => Err(OrderTransitionError {
                from: self,
                action: "print",
            }),
        }
    }

    /// Completion requires a printed ticket; completing twice is a no-op.
    pub fn complete(self) -> Result<Self, OrderTransitionError> {
        match self {
            Self::Printed | Self::Completed => Ok(Self::Completed),
            Self::New => Err(OrderTransitionError {
                from: self,
                action: "complete",
            }),
        }
    }

    /// Completed orders belong to history and are kept.
    pub fn ensure_deletable(self) -> Result<(), OrderTransitionError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(OrderTransitionError {
                from: self,
                action: "delete",
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new" => Ok(Self::New),
            "printed" => Ok(Self::Printed),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Whole minutes billed for a call: every started minute counts.
///
/// # Examples
/// ```
/// use voice_orders::domain::billable_minutes;
///
/// assert_eq!(billable_minutes(0), 0);
/// assert_eq!(billable_minutes(1), 1);
/// assert_eq!(billable_minutes(60), 1);
/// assert_eq!(billable_minutes(61), 2);
/// ```
pub const fn billable_minutes(duration_secs: u32) -> u64 {
    (duration_secs as u64).div_ceil(60)
}

/// One call turned into an order.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[schema(value_type = String, format = Uuid)]
    pub id: OrderId,
    #[schema(value_type = String, format = Uuid)]
    pub business_id: AccountId,
    pub caller_number: String,
    pub caller_name: String,
    pub order_details: String,
    pub quantity: u32,
    pub call_duration_secs: u32,
    pub call_status: String,
    pub transcript: String,
    pub status: OrderStatus,
    #[serde(skip)]
    pub webhook_payload: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn billable_minutes(&self) -> u64 {
        billable_minutes(self.call_duration_secs)
    }
}
