//! Manager for custom economic change filters.

use chrono::Utc;
use serde_json::json;

use dsws_api::{Client, Error, Settings, ECONOMIC_FILTER_SERVICE};

use crate::types::{
    FilterResponse, FilterStatus, FilterUpdate, FiltersResponse, GetAllAction, ItemError,
    NewFilter,
};
use crate::validation;

/// Wire `UpdateAction` discriminant for filter creation.
const CREATE_ACTION: i64 = 0;

/// Client for managing custom economic filters and polling the change
/// stream scoped by them.
///
/// Construction logs on against the economic filter service. As with the
/// timeseries manager, every client-side validation failure is returned as
/// a status-bearing response without touching the network; only transport
/// failures and session faults are `Err`.
pub struct EconomicFilters {
    pub(crate) gateway: Client,
}

impl EconomicFilters {
    pub async fn connect(settings: Settings) -> Result<Self, Error> {
        let gateway = Client::connect(settings, ECONOMIC_FILTER_SERVICE).await?;
        Ok(Self { gateway })
    }

    /// Returns the filters visible to the account for the given selection.
    /// Returned filters carry their constituent count but not the list
    /// itself; fetch a filter individually for its constituents.
    pub async fn get_all_filters(&self, action: GetAllAction) -> Result<FiltersResponse, Error> {
        tracing::debug!(?action, "requesting all filters");
        let body = json!({
            "GetTypes": action,
            "Properties": null,
            "TokenValue": self.gateway.token_value().await?,
        });
        self.gateway.post("GetAllFilters", &body).await
    }

    /// Returns one filter with its full constituent list. Reserved global
    /// filters (`DATASTREAM*`) are readable like any other.
    pub async fn get_filter(&self, id: &str) -> Result<FilterResponse, Error> {
        if let Err(reason) = validation::classify_filter_id(id) {
            tracing::error!("get rejected: {}", reason);
            return Ok(FilterResponse::rejected(FilterStatus::FormatError, reason));
        }
        tracing::debug!(%id, "requesting filter");
        let body = json!({
            "TokenValue": self.gateway.token_value().await?,
            "FilterId": id,
            "Properties": null,
        });
        self.gateway.post("GetFilter", &body).await
    }

    /// Creates a filter from the syntactically valid subset of the
    /// supplied constituents.
    ///
    /// Client-side syntax rejections and the service's own per-item
    /// rejections (series that do not exist in the supported universe) are
    /// merged into the response's `item_errors`; the created filter
    /// reflects only the accepted constituents. Partial rejection is still
    /// a success — only a list with no valid entry at all fails with
    /// `FilterConstituentsError`.
    pub async fn create_filter(&self, filter: &NewFilter) -> Result<FilterResponse, Error> {
        if let Err(reason) = validation::validate_owned_filter_id(&filter.filter_id) {
            tracing::error!("create rejected: {}", reason);
            return Ok(FilterResponse::rejected(FilterStatus::FormatError, reason));
        }
        if let Some(description) = &filter.description {
            if let Err(reason) = validation::validate_filter_description(description) {
                tracing::error!("create rejected: {}", reason);
                return Ok(FilterResponse::rejected(FilterStatus::FormatError, reason));
            }
        }
        if let Err(reason) = validation::validate_filter_size(filter.constituents.len()) {
            tracing::error!("create rejected: {}", reason);
            return Ok(FilterResponse::rejected(FilterStatus::SizeError, reason));
        }
        let (accepted, rejected) = validation::validate_constituents(&filter.constituents);
        if accepted.is_empty() {
            let reason = "none of the supplied constituents is a valid economic series; the filter was not created".to_string();
            tracing::error!("create rejected: {}", reason);
            return Ok(FilterResponse::rejected_items(
                FilterStatus::ConstituentsError,
                reason,
                rejected,
            ));
        }

        tracing::debug!(id = %filter.filter_id, constituents = accepted.len(), "creating filter");
        let body = json!({
            "Filter": wire_filter(
                &filter.filter_id,
                filter.description.as_deref(),
                Some(&accepted),
                filter.shared,
            ),
            "Properties": null,
            "TokenValue": self.gateway.token_value().await?,
            "UpdateAction": CREATE_ACTION,
        });
        let mut resp: FilterResponse = self.gateway.post("CreateFilter", &body).await?;
        merge_item_errors(&mut resp, rejected);
        Ok(resp)
    }

    /// Applies one mutation to an existing filter: append, remove or
    /// replace constituents, or change the description or shared flag.
    pub async fn update_filter(
        &self,
        id: &str,
        update: FilterUpdate,
    ) -> Result<FilterResponse, Error> {
        if let Err(reason) = validation::validate_owned_filter_id(id) {
            tracing::error!("update rejected: {}", reason);
            return Ok(FilterResponse::rejected(FilterStatus::FormatError, reason));
        }

        let mut client_rejected = Vec::new();
        let mut accepted = None;
        if let Some(list) = update.constituents() {
            if let Err(reason) = validation::validate_filter_size(list.len()) {
                tracing::error!("update rejected: {}", reason);
                return Ok(FilterResponse::rejected(FilterStatus::SizeError, reason));
            }
            let (ok, bad) = validation::validate_constituents(list);
            if ok.is_empty() {
                let reason =
                    "none of the supplied constituents is a valid economic series".to_string();
                tracing::error!("update rejected: {}", reason);
                return Ok(FilterResponse::rejected_items(
                    FilterStatus::ConstituentsError,
                    reason,
                    bad,
                ));
            }
            accepted = Some(ok);
            client_rejected = bad;
        }
        let description = match &update {
            FilterUpdate::Description(text) => {
                if let Err(reason) = validation::validate_filter_description(text) {
                    tracing::error!("update rejected: {}", reason);
                    return Ok(FilterResponse::rejected(FilterStatus::FormatError, reason));
                }
                Some(text.as_str())
            }
            _ => None,
        };
        let shared = matches!(update, FilterUpdate::Shared(true));

        tracing::debug!(%id, action = update.action_code(), "updating filter");
        let body = json!({
            "Filter": wire_filter(id, description, accepted.as_deref(), shared),
            "Properties": null,
            "TokenValue": self.gateway.token_value().await?,
            "UpdateAction": update.action_code(),
        });
        let mut resp: FilterResponse = self.gateway.post("UpdateFilter", &body).await?;
        merge_item_errors(&mut resp, client_rejected);
        Ok(resp)
    }

    /// Deletes a filter. The response carries the status only.
    pub async fn delete_filter(&self, id: &str) -> Result<FilterResponse, Error> {
        if let Err(reason) = validation::validate_owned_filter_id(id) {
            tracing::error!("delete rejected: {}", reason);
            return Ok(FilterResponse::rejected(FilterStatus::FormatError, reason));
        }
        tracing::debug!(%id, "deleting filter");
        let body = json!({
            "FilterId": id,
            "Properties": null,
            "TokenValue": self.gateway.token_value().await?,
        });
        self.gateway.post("DeleteFilter", &body).await
    }
}

/// Request-side filter object. Created/last-modified are placeholders the
/// service ignores; the constituent count mirrors the accepted list.
fn wire_filter(
    id: &str,
    description: Option<&str>,
    constituents: Option<&[String]>,
    shared: bool,
) -> serde_json::Value {
    let now = dsws_api::jsondate::to_wire(Utc::now());
    json!({
        "FilterId": id,
        "Description": description,
        "Constituents": constituents,
        "ConstituentsCount": constituents.map_or(0, <[String]>::len),
        "Created": now,
        "LastModified": now,
        "OwnerId": null,
        "Shared": shared,
    })
}

fn merge_item_errors(resp: &mut FilterResponse, client_rejected: Vec<ItemError>) {
    if client_rejected.is_empty() {
        return;
    }
    resp.item_errors
        .get_or_insert_with(Vec::new)
        .extend(client_rejected);
}
