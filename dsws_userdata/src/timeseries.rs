//! Manager for user-created timeseries objects.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;

use dsws_api::{Client, Error, PropertyPair, Settings, USER_DATA_SERVICE};

use crate::dates::resolve_dates;
use crate::types::{
    AccessRight, CarryIndicator, DateAlignment, DateRangeResponse, Frequency,
    FrequencyConversion, ShareType, TimeseriesRequest, UserObjectResponse, UserObjectType,
    UserObjectsResponse,
};
use crate::validation;

/// Type discriminator the service requires on timeseries request objects.
const TIMESERIES_TYPE_TAG: &str =
    "DSTimeSeriesRequestObject:http://dsws.datastream.com/client/V1/";

/// Client for creating and managing user-owned timeseries.
///
/// Construction logs on against the user data service; credential faults
/// surface there and the session cannot be used. All operations return a
/// status-bearing response — client-side validation failures come back as
/// `UserObjectFormatError` responses without a network round trip, exactly
/// like the equivalent server rejection would.
pub struct TimeseriesClient {
    gateway: Client,
}

impl TimeseriesClient {
    pub async fn connect(settings: Settings) -> Result<Self, Error> {
        let gateway = Client::connect(settings, USER_DATA_SERVICE).await?;
        Ok(Self { gateway })
    }

    /// Returns all timeseries available to the account. Items in the list
    /// carry their datapoint count but not the dates/values arrays; fetch
    /// an item individually for the full data.
    pub async fn get_all_items(&self) -> Result<UserObjectsResponse, Error> {
        tracing::debug!("requesting all timeseries items");
        let body = json!({
            "Filters": null,
            "Properties": null,
            "TokenValue": self.gateway.token_value().await?,
            "UserObjectType": UserObjectType::TimeSeries,
        });
        self.gateway.post("GetAllItems", &body).await
    }

    /// Returns one timeseries with its full date and value arrays.
    pub async fn get_item(&self, id: &str) -> Result<UserObjectResponse, Error> {
        if let Err(reason) = validation::validate_timeseries_id(id) {
            tracing::error!("get rejected: {}", reason);
            return Ok(UserObjectResponse::rejected(Some(id), reason));
        }
        tracing::debug!(%id, "requesting timeseries item");
        let body = json!({
            "Filters": null,
            "Properties": null,
            "TokenValue": self.gateway.token_value().await?,
            "UserObjectId": id,
            "UserObjectType": UserObjectType::TimeSeries,
        });
        self.gateway.post("GetItem", &body).await
    }

    /// Asks the service for the dates it supports between `start` and
    /// `end` at the given frequency — the authoritative version of
    /// [`crate::dates::resolve_dates`], including trading holidays.
    pub async fn get_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        frequency: Frequency,
    ) -> Result<DateRangeResponse, Error> {
        if start > end {
            let reason = "the start date cannot be later than the end date".to_string();
            tracing::error!("date range rejected: {}", reason);
            return Ok(DateRangeResponse::rejected(reason));
        }
        tracing::debug!(%start, %end, "requesting supported dates");
        let body = json!({
            "DateInfo": {
                "StartDate": dsws_api::jsondate::naive_to_wire(start),
                "EndDate": dsws_api::jsondate::naive_to_wire(end),
                "Frequency": frequency,
            },
            "Properties": null,
            "TokenValue": self.gateway.token_value().await?,
        });
        self.gateway.post("TimeSeriesGetDateRange", &body).await
    }

    /// Creates a timeseries. `overwrite` replaces an existing item instead
    /// of failing on an identifier clash; `skip_item` omits the created
    /// item's body from the response to save bandwidth (the status is
    /// still reported).
    pub async fn create_item(
        &self,
        item: &TimeseriesRequest,
        overwrite: bool,
        skip_item: bool,
    ) -> Result<UserObjectResponse, Error> {
        if let Err(reason) = verify_item(item) {
            tracing::error!("create rejected: {}", reason);
            return Ok(UserObjectResponse::rejected(Some(item.id.as_str()), reason));
        }
        tracing::debug!(id = %item.id, "creating timeseries");

        let mut filters = Vec::new();
        if overwrite {
            filters.push(PropertyPair::new("ForceUpdate", true));
        }
        if skip_item {
            filters.push(PropertyPair::new("SkipRetrieval", true));
        }
        let body = json!({
            "Filters": (!filters.is_empty()).then_some(filters),
            "Properties": null,
            "TokenValue": self.gateway.token_value().await?,
            "UserObject": WireTimeseries::from_request(item),
            "UserObjectType": UserObjectType::TimeSeries,
        });
        self.gateway.post("CreateItem", &body).await
    }

    /// Updates an existing timeseries with a full replacement object.
    pub async fn update_item(
        &self,
        item: &TimeseriesRequest,
        skip_item: bool,
    ) -> Result<UserObjectResponse, Error> {
        if let Err(reason) = verify_item(item) {
            tracing::error!("update rejected: {}", reason);
            return Ok(UserObjectResponse::rejected(Some(item.id.as_str()), reason));
        }
        tracing::debug!(id = %item.id, "updating timeseries");

        let filters = skip_item.then(|| vec![PropertyPair::new("SkipRetrieval", true)]);
        let body = json!({
            "Filters": filters,
            "Properties": null,
            "TokenValue": self.gateway.token_value().await?,
            "UserObject": WireTimeseries::from_request(item),
            "UserObjectType": UserObjectType::TimeSeries,
        });
        self.gateway.post("UpdateItem", &body).await
    }

    /// Deletes a timeseries. The response carries the deleted identifier
    /// but no object body.
    pub async fn delete_item(&self, id: &str) -> Result<UserObjectResponse, Error> {
        if let Err(reason) = validation::validate_timeseries_id(id) {
            tracing::error!("delete rejected: {}", reason);
            return Ok(UserObjectResponse::rejected(Some(id), reason));
        }
        tracing::debug!(%id, "deleting timeseries");
        let body = json!({
            "Filters": null,
            "Properties": null,
            "TokenValue": self.gateway.token_value().await?,
            "UserObjectId": id,
            "UserObjectType": UserObjectType::TimeSeries,
        });
        self.gateway.post("DeleteItem", &body).await
    }
}

/// Full client-side check of a create/update request: identifier format,
/// attribute bounds, date order, and the values-length-vs-resolved-dates
/// invariant.
fn verify_item(item: &TimeseriesRequest) -> Result<(), String> {
    validation::validate_timeseries_id(&item.id)?;
    if item.start > item.end {
        return Err("the start date cannot be later than the end date".to_string());
    }
    if item.values.is_empty() {
        return Err("the values array must contain at least one entry".to_string());
    }
    validation::validate_decimal_places(item.decimal_places)?;
    if let Some(units) = &item.units {
        validation::validate_units(units)?;
    }
    if let Some(name) = &item.display_name {
        validation::validate_display_name(name)?;
    }
    if let Some(group) = &item.management_group {
        validation::validate_management_group(group)?;
    }
    let expected = resolve_dates(item.start, item.end, item.frequency).len();
    if expected == 0 {
        return Err("the supplied date range resolves to no supported dates".to_string());
    }
    if item.values.len() != expected {
        return Err(format!(
            "the values array has {} entries but the range resolves to {} dates; one value per date is required",
            item.values.len(),
            expected
        ));
    }
    Ok(())
}

/// Request-side wire encoding of a timeseries. Server-assigned fields are
/// sent with safe placeholder values which the service ignores, and the
/// deprecated attributes are pinned to their documented constants.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireTimeseries<'a> {
    #[serde(rename = "__type")]
    type_tag: &'static str,
    id: &'a str,
    /// Unused for timeseries; always kept equal to the identifier.
    mnemonic: &'a str,
    display_name: &'a str,
    description: Option<&'a str>,
    #[serde(with = "dsws_api::jsondate::utc")]
    created: DateTime<Utc>,
    #[serde(with = "dsws_api::jsondate::utc")]
    last_modified: DateTime<Utc>,
    owner: Option<&'a str>,
    share_type: ShareType,
    access_right: AccessRight,
    management_group: &'a str,
    units: Option<&'a str>,
    decimal_places: u8,
    as_percentage: bool,
    frequency_conversion: FrequencyConversion,
    date_alignment: DateAlignment,
    carry_indicator: CarryIndicator,
    prime_currency_code: Option<&'a str>,
    under_currency_code: Option<&'a str>,
    has_padding: bool,
    data_input: WireDataInput<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireDataInput<'a> {
    #[serde(with = "dsws_api::jsondate::naive")]
    start_date: NaiveDate,
    #[serde(with = "dsws_api::jsondate::naive")]
    end_date: NaiveDate,
    frequency: Frequency,
    values: &'a [Option<f64>],
}

impl<'a> WireTimeseries<'a> {
    fn from_request(item: &'a TimeseriesRequest) -> Self {
        let now = Utc::now();
        Self {
            type_tag: TIMESERIES_TYPE_TAG,
            id: &item.id,
            mnemonic: &item.id,
            display_name: item.display_name.as_deref().unwrap_or(&item.id),
            description: None,
            created: now,
            last_modified: now,
            owner: None,
            share_type: ShareType::PrivateUserGroup,
            access_right: AccessRight::ReadWrite,
            management_group: item.management_group.as_deref().unwrap_or("GENERAL"),
            units: item.units.as_deref(),
            decimal_places: item.decimal_places,
            as_percentage: false,
            frequency_conversion: item.frequency_conversion,
            date_alignment: item.date_alignment,
            carry_indicator: item.carry_indicator,
            prime_currency_code: item.prime_currency_code.as_deref(),
            under_currency_code: None,
            has_padding: false,
            data_input: WireDataInput {
                start_date: item.start,
                end_date: item.end,
                frequency: item.frequency,
                values: &item.values,
            },
        }
    }
}
