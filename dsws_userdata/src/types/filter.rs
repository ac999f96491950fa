//! Economic filter object model and response types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::wire_enum;

wire_enum! {
    /// Outcome of a filter request. Carried as data on the response, never
    /// raised.
    FilterStatus {
        Success = 0,
        /// The account is not permissioned for custom economic filters.
        Permissions = 1,
        /// The requested filter does not exist.
        NotPresent = 2,
        /// The filter identifier is malformed, or the request tried to
        /// modify a reserved global filter.
        FormatError = 3,
        /// The constituent list is empty or exceeds the 100K limit.
        SizeError = 4,
        /// None of the supplied constituents was a valid economic series,
        /// so no filter was created at all. Distinct from partial success,
        /// where the filter is created from the valid remainder.
        ConstituentsError = 5,
        /// Any other failure, e.g. exceeding the per-account filter quota
        /// or creating an identifier that already exists.
        Error = 6,
    }
    fallback Error
}

impl Default for FilterStatus {
    fn default() -> Self {
        Self::Success
    }
}

impl fmt::Display for FilterStatus {
    /// Renders the service's own status names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "FilterSuccess",
            Self::Permissions => "FilterPermissions",
            Self::NotPresent => "FilterNotPresent",
            Self::FormatError => "FilterFormatError",
            Self::SizeError => "FilterSizeError",
            Self::ConstituentsError => "FilterConstituentsError",
            Self::Error => "FilterError",
        })
    }
}

wire_enum! {
    /// Which filters a get-all query returns.
    GetAllAction {
        /// Only filters created by this account.
        Personal = 0,
        /// Personal filters plus filters shared by sibling accounts.
        Shared = 1,
        /// Only the reserved global filters available to all clients.
        Datastream = 2,
        /// Everything visible to this account.
        All = 3,
    }
    fallback All
}

/// A custom economic filter as returned by the service.
///
/// Get-all queries leave `constituents` empty and populate only
/// `constituents_count`; fetch the filter individually for the full list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EconomicFilter {
    pub filter_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub constituents: Option<Vec<String>>,
    #[serde(default)]
    pub constituents_count: i64,
    /// Server-assigned.
    #[serde(default, with = "dsws_api::jsondate::opt_utc")]
    pub created: Option<DateTime<Utc>>,
    /// Server-assigned.
    #[serde(default, with = "dsws_api::jsondate::opt_utc")]
    pub last_modified: Option<DateTime<Utc>>,
    /// The parent account owning the filter; `None` for reserved global
    /// filters.
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Whether sibling accounts under the same parent can use the filter.
    #[serde(default)]
    pub shared: bool,
}

/// Input for creating a filter.
#[derive(Debug, Clone)]
pub struct NewFilter {
    pub filter_id: String,
    /// Free-text description, max 127 chars.
    pub description: Option<String>,
    /// 1..=100,000 series identifiers.
    pub constituents: Vec<String>,
    pub shared: bool,
}

impl NewFilter {
    pub fn new(filter_id: &str, constituents: Vec<String>) -> Self {
        Self {
            filter_id: filter_id.to_string(),
            description: None,
            constituents,
            shared: false,
        }
    }
}

/// The one mutation applied by an update call. Exactly one mode per call
/// by construction.
#[derive(Debug, Clone)]
pub enum FilterUpdate {
    /// Append series to the existing constituent list.
    Append(Vec<String>),
    /// Remove series from the existing constituent list.
    Remove(Vec<String>),
    /// Replace the entire constituent list.
    Replace(Vec<String>),
    /// Change the description only.
    Description(String),
    /// Change whether the filter is shared with sibling accounts.
    Shared(bool),
}

impl FilterUpdate {
    /// The wire `UpdateAction` discriminant (create is 0).
    pub(crate) fn action_code(&self) -> i64 {
        match self {
            Self::Append(_) => 1,
            Self::Replace(_) => 2,
            Self::Remove(_) => 3,
            Self::Description(_) => 4,
            Self::Shared(_) => 5,
        }
    }

    pub(crate) fn constituents(&self) -> Option<&[String]> {
        match self {
            Self::Append(list) | Self::Remove(list) | Self::Replace(list) => Some(list),
            _ => None,
        }
    }
}

/// One rejected constituent with the reason it was rejected. Produced both
/// client-side (syntax) and server-side (unknown series), merged into a
/// single list on the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemError {
    pub item: String,
    pub reason: String,
}

impl ItemError {
    pub(crate) fn new(item: &str, reason: impl Into<String>) -> Self {
        Self {
            item: item.to_string(),
            reason: reason.into(),
        }
    }
}

impl<'de> Deserialize<'de> for ItemError {
    /// The service reports rejected items either as bare series codes or as
    /// `{Item, Reason}` pairs; both normalize to an [`ItemError`].
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Pair {
                #[serde(rename = "Item")]
                item: String,
                #[serde(rename = "Reason", default)]
                reason: Option<String>,
            },
            Text(String),
        }
        Ok(match Wire::deserialize(de)? {
            Wire::Pair { item, reason } => Self {
                item,
                reason: reason.unwrap_or_else(|| "rejected by the service".to_string()),
            },
            Wire::Text(item) => Self {
                item,
                reason: "rejected by the service".to_string(),
            },
        })
    }
}

/// Response to a single-filter operation. After a successful delete the
/// filter body is `None`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilterResponse {
    #[serde(default)]
    pub filter: Option<EconomicFilter>,
    #[serde(default)]
    pub response_status: FilterStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub item_errors: Option<Vec<ItemError>>,
}

impl FilterResponse {
    pub(crate) fn rejected(status: FilterStatus, message: String) -> Self {
        Self {
            filter: None,
            response_status: status,
            error_message: Some(message),
            item_errors: None,
        }
    }

    pub(crate) fn rejected_items(
        status: FilterStatus,
        message: String,
        items: Vec<ItemError>,
    ) -> Self {
        Self {
            filter: None,
            response_status: status,
            error_message: Some(message),
            item_errors: Some(items),
        }
    }
}

/// Response to a get-all query. An empty list with `Success` status means
/// no filters are visible to the account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FiltersResponse {
    #[serde(default)]
    pub filters: Option<Vec<EconomicFilter>>,
    #[serde(default)]
    pub filter_count: i64,
    #[serde(default)]
    pub response_status: FilterStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_status_displays_wire_vocabulary() {
        assert_eq!(FilterStatus::Success.to_string(), "FilterSuccess");
        assert_eq!(
            FilterStatus::ConstituentsError.to_string(),
            "FilterConstituentsError"
        );
    }

    #[test]
    fn unknown_filter_status_degrades_to_generic_error() {
        assert_eq!(FilterStatus::from(42), FilterStatus::Error);
    }

    #[test]
    fn item_errors_decode_from_strings_and_pairs() {
        let errors: Vec<ItemError> = serde_json::from_value(serde_json::json!([
            "USGDP...X",
            {"Item": "UKBADCODE", "Reason": "series does not exist"},
        ]))
        .unwrap();
        assert_eq!(errors[0].item, "USGDP...X");
        assert_eq!(errors[1].item, "UKBADCODE");
        assert_eq!(errors[1].reason, "series does not exist");
    }

    #[test]
    fn update_actions_map_to_wire_codes() {
        assert_eq!(FilterUpdate::Append(vec![]).action_code(), 1);
        assert_eq!(FilterUpdate::Replace(vec![]).action_code(), 2);
        assert_eq!(FilterUpdate::Remove(vec![]).action_code(), 3);
        assert_eq!(FilterUpdate::Description(String::new()).action_code(), 4);
        assert_eq!(FilterUpdate::Shared(true).action_code(), 5);
    }
}
