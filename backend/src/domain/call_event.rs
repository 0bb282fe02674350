//! Normalisation of call-completion events posted by the voice provider.
//!
//! Providers are inconsistent about field names, so each value is looked up
//! under a list of aliases, first at the top level and then inside a nested
//! `structured_data` (or `structuredData`) object. Blank strings, zeroes and
//! nulls count as absent and fall through to the next alias.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::{AccountId, Order, OrderId, OrderStatus};

pub const UNKNOWN_CALLER: &str = "Unknown";
pub const NO_ORDER_DETAILS: &str = "No order details";
pub const DEFAULT_CALL_STATUS: &str = "completed";
/// Longest call billed from a single event: one day.
pub const MAX_CALL_DURATION_SECS: u32 = 24 * 60 * 60;

const CALLER_NUMBER_KEYS: &[&str] = &["caller_number", "from", "phone_number"];
const CALLER_NAME_KEYS: &[&str] = &["caller_name", "customer_name"];
const ORDER_KEYS: &[&str] = &["order", "order_details"];
const QUANTITY_KEYS: &[&str] = &["quantity"];
const DURATION_KEYS: &[&str] = &["call_duration", "duration"];
const STATUS_KEYS: &[&str] = &["call_status", "status"];
const TRANSCRIPT_KEYS: &[&str] = &["transcript", "message"];
const NESTED_KEYS: &[&str] = &["structured_data", "structuredData"];

/// Rejected event payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallEventError {
    #[error("call event payload must be a JSON object")]
    NotAnObject,
}

/// A call event with every field resolved to a concrete value.
#[derive(Debug, Clone, PartialEq)]
pub struct CallEvent {
    pub caller_number: String,
    pub caller_name: String,
    pub order_details: String,
    pub quantity: u32,
    pub call_duration_secs: u32,
    pub call_status: String,
    pub transcript: String,
    pub payload: Value,
}

impl CallEvent {
    /// Extract the call fields from a raw webhook body, keeping the body.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use voice_orders::domain::CallEvent;
    ///
    /// let event = CallEvent::from_payload(json!({
    ///     "from": "+911234567890",
    ///     "duration": 75,
    ///     "structuredData": { "customer_name": "Asha", "order": "2 dosa" }
    /// }))
    /// .expect("object payload");
    /// assert_eq!(event.caller_number, "+911234567890");
    /// assert_eq!(event.caller_name, "Asha");
    /// assert_eq!(event.call_duration_secs, 75);
    /// assert_eq!(event.call_status, "completed");
    /// ```
    pub fn from_payload(payload: Value) -> Result<Self, CallEventError> {
        let root = payload.as_object().ok_or(CallEventError::NotAnObject)?;
        let lookup = Lookup::new(root);

        let caller_number = lookup
            .text(CALLER_NUMBER_KEYS)
            .unwrap_or_else(|| UNKNOWN_CALLER.to_owned());
        let caller_name = lookup
            .text(CALLER_NAME_KEYS)
            .unwrap_or_else(|| UNKNOWN_CALLER.to_owned());
        let order_details = lookup
            .text(ORDER_KEYS)
            .unwrap_or_else(|| NO_ORDER_DETAILS.to_owned());
        let quantity = lookup.count(QUANTITY_KEYS).unwrap_or(0);
        let call_duration_secs = lookup
            .count(DURATION_KEYS)
            .map_or(0, |secs| secs.min(MAX_CALL_DURATION_SECS));
        let call_status = lookup
            .text(STATUS_KEYS)
            .unwrap_or_else(|| DEFAULT_CALL_STATUS.to_owned());
        let transcript = lookup.string_only(TRANSCRIPT_KEYS).unwrap_or_default();

        Ok(Self {
            caller_number,
            caller_name,
            order_details,
            quantity,
            call_duration_secs,
            call_status,
            transcript,
            payload,
        })
    }

    /// Turn the event into a fresh `new` order for `business_id`.
    pub fn into_order(self, business_id: AccountId, received_at: DateTime<Utc>) -> Order {
        Order {
            id: OrderId::random(),
            business_id,
            caller_number: self.caller_number,
            caller_name: self.caller_name,
            order_details: self.order_details,
            quantity: self.quantity,
            call_duration_secs: self.call_duration_secs,
            call_status: self.call_status,
            transcript: self.transcript,
            status: OrderStatus::New,
            webhook_payload: self.payload,
            created_at: received_at,
            updated_at: received_at,
        }
    }
}

struct Lookup<'a> {
    scopes: Vec<&'a Map<String, Value>>,
}

impl<'a> Lookup<'a> {
    fn new(root: &'a Map<String, Value>) -> Self {
        let mut scopes = vec![root];
        scopes.extend(
            NESTED_KEYS
                .iter()
                .filter_map(|key| root.get(*key).and_then(Value::as_object)),
        );
        Self { scopes }
    }

    fn first<T>(&self, keys: &[&str], convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        self.scopes
            .iter()
            .flat_map(|scope| keys.iter().filter_map(move |key| scope.get(*key)))
            .find_map(convert)
    }

    /// Non-blank strings, or numbers rendered as text.
    fn text(&self, keys: &[&str]) -> Option<String> {
        self.first(keys, |value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    fn string_only(&self, keys: &[&str]) -> Option<String> {
        self.first(keys, |value| {
            value
                .as_str()
                .filter(|s| !s.trim().is_empty())
                .map(str::to_owned)
        })
    }

    /// Positive whole numbers from JSON numbers or numeric strings.
    fn count(&self, keys: &[&str]) -> Option<u32> {
        self.first(keys, |value| {
            let raw = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }?;
            to_count(raw)
        })
    }
}

fn to_count(raw: f64) -> Option<u32> {
    if !raw.is_finite() {
        return None;
    }
    let rounded = raw.round().clamp(0.0, f64::from(u32::MAX));
    if rounded > 0.0 {
        Some(rounded as u32)
    } else {
        None
    }
}
