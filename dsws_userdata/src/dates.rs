//! Local resolution of the dates the service supports for a range and
//! frequency.
//!
//! The service stores monthly, quarterly and yearly datapoints against the
//! first day of each period, and daily/weekly datapoints against trading
//! days. This module mirrors those documented rules so a timeseries'
//! values array can be length-checked against the resolved date list
//! before any request is sent. The one divergence from the authoritative
//! server list ([`crate::TimeseriesClient::get_date_range`]): trading
//! holidays are unknowable client-side, so daily and weekly resolution
//! applies weekend rules only.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::types::{DateAlignment, Frequency};

/// Weekend dates adjust backwards to the preceding Friday; the service
/// documents range endpoints as moving to the trading day *before* the
/// supplied date.
fn back_to_weekday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Days::new(1),
        Weekday::Sun => date - Days::new(2),
        _ => date,
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("month in 1..=12")
}

fn quarter_start_month(month: u32) -> u32 {
    ((month - 1) / 3) * 3 + 1
}

fn months_from(year: i32, month: u32, step: u32) -> impl Iterator<Item = NaiveDate> {
    let start_index = year as i64 * 12 + (month as i64 - 1);
    (0..)
        .map(move |i| start_index + i as i64 * step as i64)
        .map(|index| first_of_month((index / 12) as i32, (index % 12) as u32 + 1))
}

/// Resolves the supported dates between `start` and `end` (inclusive) at
/// the given frequency. Monthly and lower frequencies return the first day
/// of each period containing the range; the returned list is empty when
/// the adjusted range is empty.
pub fn resolve_dates(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    match frequency {
        Frequency::Daily => {
            let first = back_to_weekday(start);
            let last = back_to_weekday(end);
            let mut dates = Vec::new();
            let mut date = first;
            while date <= last {
                if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                    dates.push(date);
                }
                date = date + Days::new(1);
            }
            dates
        }
        Frequency::Weekly => {
            let first = back_to_weekday(start);
            let last = back_to_weekday(end);
            let mut dates = Vec::new();
            let mut date = first;
            while date <= last {
                dates.push(date);
                date = date + Days::new(7);
            }
            dates
        }
        Frequency::Monthly => months_from(start.year(), start.month(), 1)
            .take_while(|date| (date.year(), date.month()) <= (end.year(), end.month()))
            .collect(),
        Frequency::Quarterly => months_from(start.year(), quarter_start_month(start.month()), 3)
            .take_while(|date| {
                (date.year(), date.month()) <= (end.year(), quarter_start_month(end.month()))
            })
            .collect(),
        Frequency::Yearly => (start.year()..=end.year())
            .map(|year| first_of_month(year, 1))
            .collect(),
    }
}

/// Maps a period's first date to the representative date implied by the
/// series' alignment. Daily and weekly dates are returned unchanged.
pub fn align_period_date(
    first_of_period: NaiveDate,
    frequency: Frequency,
    alignment: DateAlignment,
) -> NaiveDate {
    let (year, month) = (first_of_period.year(), first_of_period.month());
    match (frequency, alignment) {
        (Frequency::Daily | Frequency::Weekly, _) => first_of_period,
        (_, DateAlignment::StartPeriod) => first_of_period,
        (Frequency::Monthly, DateAlignment::MidPeriod) => {
            NaiveDate::from_ymd_opt(year, month, 15).expect("day 15 exists in every month")
        }
        (Frequency::Monthly, DateAlignment::EndPeriod) => last_of_month(year, month),
        (Frequency::Quarterly, DateAlignment::MidPeriod) => {
            NaiveDate::from_ymd_opt(year, month + 1, 15).expect("middle month of a quarter")
        }
        (Frequency::Quarterly, DateAlignment::EndPeriod) => last_of_month(year, month + 2),
        (Frequency::Yearly, DateAlignment::MidPeriod) => {
            NaiveDate::from_ymd_opt(year, 6, 30).expect("June 30 exists")
        }
        (Frequency::Yearly, DateAlignment::EndPeriod) => last_of_month(year, 12),
    }
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let next = if month == 12 {
        first_of_month(year + 1, 1)
    } else {
        first_of_month(year, month + 1)
    };
    next - Days::new(1)
}
