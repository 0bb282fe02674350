//! Completed-order history: search, summary and CSV export.
//!
//! The same [`HistoryFilter`] drives the JSON listing and the CSV download,
//! so an export always contains exactly the rows the user is looking at.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Order;

pub const CSV_HEADER: &str = "Order ID,Caller Name,Phone Number,Order,Quantity,Date,Status";
const CSV_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rejected history filter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryFilterError {
    #[error("from must not be later than to")]
    InvertedRange,
}

/// Free-text search plus an inclusive creation-time window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    needle: Option<String>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl HistoryFilter {
    pub fn new(
        search: Option<&str>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Self, HistoryFilterError> {
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(HistoryFilterError::InvertedRange);
            }
        }
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Ok(Self { needle, from, to })
    }

    pub fn from(&self) -> Option<DateTime<Utc>> {
        self.from
    }

    pub fn to(&self) -> Option<DateTime<Utc>> {
        self.to
    }

    /// Case-insensitive match on caller name, number, order text, or an
    /// order-id prefix, within the time window.
    pub fn matches(&self, order: &Order) -> bool {
        if self.from.is_some_and(|from| order.created_at < from)
            || self.to.is_some_and(|to| order.created_at > to)
        {
            return false;
        }
        let Some(needle) = &self.needle else {
            return true;
        };
        order.caller_name.to_lowercase().contains(needle)
            || order.caller_number.to_lowercase().contains(needle)
            || order.order_details.to_lowercase().contains(needle)
            || order.id.to_string().starts_with(needle.as_str())
    }
}

/// Totals shown under the history table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub total_orders: usize,
    pub total_quantity: u64,
    pub total_minutes: u64,
}

/// Filtered completed orders, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistory {
    pub orders: Vec<Order>,
    pub summary: HistorySummary,
}

impl OrderHistory {
    pub fn from_orders(orders: Vec<Order>, filter: &HistoryFilter) -> Self {
        let mut orders: Vec<Order> = orders.into_iter().filter(|o| filter.matches(o)).collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let summary = orders.iter().fold(HistorySummary::default(), |acc, order| {
            HistorySummary {
                total_orders: acc.total_orders + 1,
                total_quantity: acc.total_quantity + u64::from(order.quantity),
                total_minutes: acc.total_minutes + order.billable_minutes(),
            }
        });
        Self { orders, summary }
    }

    /// Render the rows as CSV with a header line and one line per order.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for order in &self.orders {
            let quantity = order.quantity.to_string();
            let date = order.created_at.format(CSV_DATE_FORMAT).to_string();
            let cells = [
                csv_cell(&order.id.to_string()),
                csv_cell(&order.caller_name),
                csv_cell(&order.caller_number),
                csv_cell(&order.order_details),
                csv_cell(&quantity),
                csv_cell(&date),
                csv_cell(order.status.as_str()),
            ];
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }
}

/// Prefix spreadsheet formula triggers, then quote when needed.
fn csv_cell(raw: &str) -> String {
    let neutralised = if raw.starts_with(['=', '+', '-', '@', '\t', '\r']) {
        format!("'{raw}")
    } else {
        raw.to_owned()
    };
    if neutralised.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", neutralised.replace('"', "\"\""))
    } else {
        neutralised
    }
}
