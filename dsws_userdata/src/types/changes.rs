//! Change-polling types: cursor, update records, page responses.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::wire_enum;
use super::FilterStatus;

wire_enum! {
    /// Update frequency of a changed economic series. This is a different
    /// vocabulary from the timeseries [`super::Frequency`]: it includes
    /// semi-annual, and annual sits at a different discriminant.
    UpdateFrequency {
        Daily = 0,
        Weekly = 1,
        Monthly = 2,
        Quarterly = 3,
        SemiAnnually = 4,
        Annually = 5,
    }
    fallback Daily
}

impl Default for UpdateFrequency {
    fn default() -> Self {
        Self::Daily
    }
}

/// One changed or corrected economic series.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeUpdate {
    /// The series mnemonic, e.g. `USGDP...D`.
    pub series: String,
    #[serde(default)]
    pub frequency: UpdateFrequency,
    /// When the change notification reached the service (UTC).
    #[serde(with = "dsws_api::jsondate::utc")]
    pub updated: DateTime<Utc>,
}

/// An opaque position in the change-event stream.
///
/// Cursors are issued by the service and only ever stored and replayed by
/// this client; the value is never interpreted. A cursor is bound to the
/// scope it was obtained under (a filter identifier, or the unscoped
/// stream) and can only be replayed under that scope — the scope travels
/// inside the token, so a cross-scope replay cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeCursor {
    sequence: i64,
    scope: Option<String>,
}

impl ChangeCursor {
    pub(crate) fn new(sequence: i64, scope: Option<String>) -> Self {
        Self { sequence, scope }
    }

    pub(crate) fn sequence(&self) -> i64 {
        self.sequence
    }

    /// The filter identifier this cursor is scoped to, if any.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

impl fmt::Display for ChangeCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{} (filter {scope})", self.sequence),
            None => write!(f, "{}", self.sequence),
        }
    }
}

/// One page of the change stream.
///
/// On `FilterSuccess`, `next` carries the cursor for the following page
/// (or, once `updates_pending` is false, the id the next future update
/// will receive). On any other status `next` is `None` and the caller's
/// previously held cursor remains the position of record.
#[derive(Debug)]
pub struct ChangesResponse {
    pub next: Option<ChangeCursor>,
    /// Echo of the filter the query was scoped to.
    pub filter_id: Option<String>,
    pub updates: Vec<ChangeUpdate>,
    pub updates_count: i64,
    /// True when more pages are immediately available beyond the 10K
    /// records in this one.
    pub updates_pending: bool,
    /// How many further updates are pending when `updates_pending` is set.
    pub pending_count: i64,
    pub response_status: FilterStatus,
    pub error_message: Option<String>,
}

impl ChangesResponse {
    pub(crate) fn rejected(scope: Option<&str>, status: FilterStatus, message: String) -> Self {
        Self {
            next: None,
            filter_id: scope.map(str::to_string),
            updates: Vec::new(),
            updates_count: 0,
            updates_pending: false,
            pending_count: 0,
            response_status: status,
            error_message: Some(message),
        }
    }
}

/// Raw wire shape of a change page; converted to [`ChangesResponse`] by
/// the manager, which knows the request's scope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireChangesResponse {
    #[serde(default)]
    pub next_sequence_id: i64,
    #[serde(default)]
    pub filter_id: Option<String>,
    #[serde(default)]
    pub updates_count: i64,
    #[serde(default)]
    pub updates: Option<Vec<ChangeUpdate>>,
    #[serde(default)]
    pub updates_pending: bool,
    #[serde(default)]
    pub pending_count: i64,
    #[serde(default)]
    pub response_status: FilterStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl WireChangesResponse {
    pub(crate) fn into_response(self, scope: Option<&str>) -> ChangesResponse {
        let next = (self.response_status == FilterStatus::Success)
            .then(|| ChangeCursor::new(self.next_sequence_id, scope.map(str::to_string)));
        ChangesResponse {
            next,
            filter_id: self.filter_id,
            updates: self.updates.unwrap_or_default(),
            updates_count: self.updates_count,
            updates_pending: self.updates_pending,
            pending_count: self.pending_count,
            response_status: self.response_status,
            error_message: self.error_message,
        }
    }
}

/// Where a [`crate::ChangeStream`] sits in the cursor-chain protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No cursor yet; the stream must be seeded from a timestamp.
    Seeding,
    /// More pages are immediately available and should be fetched now.
    Draining,
    /// The stream has consumed every available update. Wait at least the
    /// minimum poll interval before asking again.
    CaughtUp,
}

/// A fully drained batch of updates: every page fetched while the stream
/// reported more pending, concatenated in stream order.
#[derive(Debug)]
pub struct ChangesBatch {
    pub updates: Vec<ChangeUpdate>,
    /// Status of the last page fetched. Anything other than success means
    /// the batch stopped early and the stream cursor was not advanced past
    /// the last good page.
    pub response_status: FilterStatus,
    pub error_message: Option<String>,
}
