//! Timeseries object model and response types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::wire_enum;
use super::{AccessRight, Frequency, ShareType, UserObjectStatus, UserObjectType};

wire_enum! {
    /// How values are combined when a user requests the series at a lower
    /// frequency than it was supplied at.
    FrequencyConversion {
        /// The value at the end of the requested period.
        EndValue = 0,
        /// The average of the values in the requested period.
        AverageValue = 1,
        /// The sum of the values in the requested period (e.g. annualising
        /// quarterly GDP).
        SumValues = 2,
        /// The value stored for the exact requested date.
        ActualValue = 3,
    }
    fallback EndValue
}

impl Default for FrequencyConversion {
    fn default() -> Self {
        Self::EndValue
    }
}

wire_enum! {
    /// Which calendar date represents a monthly/quarterly/yearly period
    /// when the series is returned to end users. Data is always stored
    /// against the first day of the period.
    DateAlignment {
        /// Last day of the month, quarter or year.
        EndPeriod = 0,
        /// First day of the month, quarter or year.
        StartPeriod = 1,
        /// 15th of the month, 15th of a quarter's middle month, or June 30.
        MidPeriod = 2,
    }
    fallback EndPeriod
}

impl Default for DateAlignment {
    fn default() -> Self {
        Self::EndPeriod
    }
}

wire_enum! {
    /// How not-a-number values (encoded as nulls on the wire) are stored.
    CarryIndicator {
        /// Nulls are replaced with the last preceding real value.
        Yes = 0,
        /// Nulls are stored and returned as-is.
        No = 1,
        /// Like `Yes`, and the final value is also padded forward for
        /// requests beyond the end of the series.
        Pad = 2,
    }
    fallback Yes
}

impl Default for CarryIndicator {
    fn default() -> Self {
        Self::Yes
    }
}

/// Input for creating or updating a timeseries.
///
/// The identifier must be 8 uppercase alphanumeric characters starting
/// with `TS` (e.g. `TSABC001`). Values are aligned 1:1 with the dates the
/// service supports for (start, end, frequency); `None` entries encode
/// not-a-number for non-trading days. The end date is informational — the
/// service derives the true end from the start date, frequency and value
/// count.
#[derive(Debug, Clone)]
pub struct TimeseriesRequest {
    pub id: String,
    /// Shown in search tools; defaults to the identifier. Max 64 chars.
    pub display_name: Option<String>,
    /// Optional grouping folder, max 10 chars. The service files the item
    /// under `GENERAL` when absent.
    pub management_group: Option<String>,
    /// Qualifying unit label, e.g. "Billions". Max 12 chars.
    pub units: Option<String>,
    /// Stored precision, 0..=8 decimal places.
    pub decimal_places: u8,
    pub frequency_conversion: FrequencyConversion,
    pub date_alignment: DateAlignment,
    pub carry_indicator: CarryIndicator,
    /// Optional 2-character currency code.
    pub prime_currency_code: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub frequency: Frequency,
    pub values: Vec<Option<f64>>,
}

impl TimeseriesRequest {
    /// A request with the key fields set and every optional attribute at
    /// its service default.
    pub fn new(
        id: &str,
        start: NaiveDate,
        end: NaiveDate,
        frequency: Frequency,
        values: Vec<Option<f64>>,
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: None,
            management_group: None,
            units: None,
            decimal_places: 0,
            frequency_conversion: FrequencyConversion::default(),
            date_alignment: DateAlignment::default(),
            carry_indicator: CarryIndicator::default(),
            prime_currency_code: None,
            start,
            end,
            frequency,
            values,
        }
    }
}

/// Start/end/frequency summary of a stored timeseries. The dates reflect
/// the series' date alignment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateInfo {
    #[serde(with = "dsws_api::jsondate::naive")]
    pub start_date: NaiveDate,
    #[serde(with = "dsws_api::jsondate::naive")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub frequency: Frequency,
}

/// The stored datapoints of a timeseries. Get-all queries return only the
/// count; the dates and values come back `None` until the item is fetched
/// individually.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DateRangeData {
    #[serde(default, with = "dsws_api::jsondate::naive_dates")]
    pub dates: Option<Vec<NaiveDate>>,
    #[serde(default)]
    pub values: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub values_count: i64,
}

/// A timeseries as returned by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Timeseries {
    pub id: String,
    /// Always equal to the identifier for timeseries.
    #[serde(default)]
    pub mnemonic: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Server-assigned; ignored on create/update.
    #[serde(default, with = "dsws_api::jsondate::opt_utc")]
    pub created: Option<DateTime<Utc>>,
    /// Server-assigned; ignored on create/update.
    #[serde(default, with = "dsws_api::jsondate::opt_utc")]
    pub last_modified: Option<DateTime<Utc>>,
    /// The parent account owning the object.
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub share_type: ShareType,
    #[serde(default)]
    pub access_right: AccessRight,
    #[serde(default)]
    pub management_group: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub decimal_places: u8,
    #[serde(default)]
    pub frequency_conversion: FrequencyConversion,
    #[serde(default)]
    pub date_alignment: DateAlignment,
    #[serde(default)]
    pub carry_indicator: CarryIndicator,
    #[serde(default)]
    pub prime_currency_code: Option<String>,
    #[serde(default)]
    pub date_info: Option<DateInfo>,
    #[serde(default)]
    pub date_range: Option<DateRangeData>,
}

/// Response to a single-item operation (get, create, update, delete).
///
/// `user_object` is `None` after a delete or when the item body was
/// skipped; the status still reports the outcome.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserObjectResponse {
    #[serde(default)]
    pub user_object_id: Option<String>,
    #[serde(default)]
    pub user_object_type: UserObjectType,
    #[serde(default)]
    pub user_object: Option<Timeseries>,
    #[serde(default)]
    pub response_status: UserObjectStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl UserObjectResponse {
    /// A client-side rejection, produced before any request is sent.
    pub(crate) fn rejected(id: Option<&str>, message: String) -> Self {
        Self {
            user_object_id: id.map(str::to_string),
            user_object_type: UserObjectType::TimeSeries,
            user_object: None,
            response_status: UserObjectStatus::FormatError,
            error_message: Some(message),
        }
    }
}

/// Response to a get-all query: a count plus the items. An empty list with
/// `Success` status means the account simply has no items, which is
/// distinct from a non-success status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserObjectsResponse {
    #[serde(default)]
    pub user_object_type: UserObjectType,
    #[serde(default)]
    pub user_objects: Option<Vec<Timeseries>>,
    #[serde(default)]
    pub user_objects_count: i64,
    #[serde(default)]
    pub response_status: UserObjectStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// The dates the service supports between two dates at a frequency. This
/// list is the contract a timeseries' values array must match in length.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateRangeResponse {
    #[serde(default, with = "dsws_api::jsondate::naive_dates")]
    pub dates: Option<Vec<NaiveDate>>,
    #[serde(default)]
    pub response_status: UserObjectStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl DateRangeResponse {
    pub(crate) fn rejected(message: String) -> Self {
        Self {
            dates: None,
            response_status: UserObjectStatus::FormatError,
            error_message: Some(message),
        }
    }
}
