//! Call usage and billing for a business account.
//!
//! Periods are evaluated in UTC. Calls are billed per started minute at the
//! account's [`CallRate`].

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::{AccountId, CallRate, billable_minutes};

/// Minutes included in a month before the plan is exhausted.
pub const DEFAULT_MONTHLY_MINUTE_LIMIT: u64 = 5000;

/// The billing-relevant part of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallRecord {
    pub duration_secs: u32,
    pub created_at: DateTime<Utc>,
}

/// Lifetime call totals for one business, used by the admin listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTotals {
    pub business_id: AccountId,
    pub calls: u64,
    pub billable_minutes: u64,
}

/// Calls, minutes and charges over one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsagePeriod {
    pub calls: u64,
    pub minutes: u64,
    pub charges_paise: u64,
}

impl UsagePeriod {
    fn add(self, record: &CallRecord, rate: CallRate) -> Self {
        let minutes = billable_minutes(record.duration_secs);
        Self {
            calls: self.calls.saturating_add(1),
            minutes: self.minutes.saturating_add(minutes),
            charges_paise: self.charges_paise.saturating_add(rate.charge_for(minutes)),
        }
    }
}

/// Usage dashboard for the signed-in business.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallUsage {
    pub today: UsagePeriod,
    pub this_month: UsagePeriod,
    /// Rupees per billable minute.
    pub call_rate: f64,
    pub call_rate_paise: u32,
    pub monthly_limit_minutes: u64,
    pub limit_used_percent: f64,
    pub average_minutes_per_call_today: f64,
    pub projected_month_charges_paise: u64,
    pub month_start: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
}

/// Midnight UTC on the first day of `now`'s month.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    first_of_month(now.year(), now.month())
        .and_time(NaiveTime::MIN)
        .and_utc()
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn days_in_month(now: DateTime<Utc>) -> u64 {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let next = first_of_month(year, month);
    let this = first_of_month(now.year(), now.month());
    u64::try_from((next - this).num_days()).unwrap_or(30)
}

impl CallUsage {
    /// Aggregate `records` (any calls since the start of the month) as of `now`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use voice_orders::domain::{CallRate, CallRecord, CallUsage};
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 4, 10, 15, 0, 0).unwrap();
    /// let calls = [CallRecord { duration_secs: 90, created_at: now }];
    /// let usage = CallUsage::compute(&calls, CallRate::from_paise(200), 5000, now);
    /// assert_eq!(usage.today.minutes, 2);
    /// assert_eq!(usage.today.charges_paise, 400);
    /// ```
    pub fn compute(
        records: &[CallRecord],
        rate: CallRate,
        monthly_limit_minutes: u64,
        now: DateTime<Utc>,
    ) -> Self {
        let month_start = month_start(now);
        let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);

        let (today, this_month) = records
            .iter()
            .filter(|r| r.created_at >= month_start && r.created_at <= now)
            .fold(
                (UsagePeriod::default(), UsagePeriod::default()),
                |(today, month), record| {
                    let today = if record.created_at >= day_start && record.created_at < day_end {
                        today.add(record, rate)
                    } else {
                        today
                    };
                    (today, month.add(record, rate))
                },
            );

        let limit_used_percent = if monthly_limit_minutes == 0 {
            0.0
        } else {
            this_month.minutes as f64 * 100.0 / monthly_limit_minutes as f64
        };
        let average_minutes_per_call_today = if today.calls == 0 {
            0.0
        } else {
            today.minutes as f64 / today.calls as f64
        };
        let day_of_month = u64::from(now.day()).max(1);
        let projected_month_charges_paise =
            this_month.charges_paise * days_in_month(now) / day_of_month;

        Self {
            today,
            this_month,
            call_rate: rate.rupees(),
            call_rate_paise: rate.paise(),
            monthly_limit_minutes,
            limit_used_percent,
            average_minutes_per_call_today,
            projected_month_charges_paise,
            month_start,
            generated_at: now,
        }
    }
}
