//! The sequence-cursor protocol for polling economic changes and
//! corrections.
//!
//! The service exposes a strictly ordered, replayable log of change events
//! across the economic-series universe. A poll either *seeds* (exchanges a
//! start timestamp for a cursor) or *resumes* (exchanges a cursor for a
//! page of up to 10K updates plus the next cursor). Pages returned while
//! the service reports more pending form one logical batch; once caught
//! up, well-behaved clients wait at least ten minutes before polling
//! again.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::json;

use dsws_api::Error;

use crate::filters::EconomicFilters;
use crate::types::{
    ChangeCursor, ChangesBatch, ChangesResponse, FilterStatus, PollState, WireChangesResponse,
};
use crate::validation;

/// Cooperative minimum interval between polls once a stream is caught up.
/// The service may rate-limit or flag accounts polling faster.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(600);

/// Oldest start timestamp the service accepts when seeding.
const MAX_LOOKBACK_DAYS: i64 = 28;

impl EconomicFilters {
    /// Exchanges a start timestamp for a cursor (seed mode).
    ///
    /// `since = None` means 00:00 on the most recent prior weekday, as
    /// resolved by the service. Timestamps more than 28 days in the past
    /// are rejected client-side; future timestamps return the cursor the
    /// next update will receive. `scope` restricts the resulting cursor
    /// chain to one filter's constituents (or a reserved global filter)
    /// and is recorded inside the returned cursor.
    pub async fn get_economic_changes_since(
        &self,
        since: Option<DateTime<Utc>>,
        scope: Option<&str>,
    ) -> Result<ChangesResponse, Error> {
        if let Some(scope) = scope {
            if let Err(reason) = validation::classify_filter_id(scope) {
                tracing::error!("changes rejected: {}", reason);
                return Ok(ChangesResponse::rejected(
                    Some(scope),
                    FilterStatus::FormatError,
                    reason,
                ));
            }
        }
        if let Some(since) = since {
            let oldest = Utc::now() - chrono::Duration::days(MAX_LOOKBACK_DAYS);
            if since < oldest {
                let reason = format!(
                    "the start timestamp {since} is more than {MAX_LOOKBACK_DAYS} days in the past"
                );
                tracing::error!("changes rejected: {}", reason);
                return Ok(ChangesResponse::rejected(
                    scope,
                    FilterStatus::Error,
                    reason,
                ));
            }
        }

        match since {
            Some(since) => tracing::debug!(%since, "requesting change sequence from timestamp"),
            None => tracing::debug!("requesting default change sequence (prior weekday)"),
        }
        let body = json!({
            "TokenValue": self.gateway.token_value().await?,
            "StartDate": since.map(dsws_api::jsondate::to_wire),
            "SequenceId": 0,
            "Filter": null,
            "Properties": null,
        });
        let wire: WireChangesResponse = self.gateway.post("GetEconomicChanges", &body).await?;
        Ok(wire.into_response(scope))
    }

    /// Fetches the page at `cursor` (resume mode). Re-polling the same
    /// cursor is idempotent: the service replays the identical page. The
    /// cursor's scope travels with it, so a page is always fetched under
    /// the scope the cursor was issued for.
    pub async fn get_economic_changes(
        &self,
        cursor: &ChangeCursor,
    ) -> Result<ChangesResponse, Error> {
        tracing::debug!(%cursor, "requesting changes from cursor");
        let body = json!({
            "TokenValue": self.gateway.token_value().await?,
            "StartDate": null,
            "SequenceId": cursor.sequence(),
            "Filter": cursor.scope(),
            "Properties": null,
        });
        let wire: WireChangesResponse = self.gateway.post("GetEconomicChanges", &body).await?;
        Ok(wire.into_response(cursor.scope()))
    }

    /// A new, unseeded change stream, optionally scoped to one filter.
    pub fn change_stream(&self, scope: Option<&str>) -> ChangeStream<'_> {
        ChangeStream {
            filters: self,
            scope: scope.map(str::to_string),
            cursor: None,
            state: PollState::Seeding,
            caught_up_at: None,
        }
    }

    /// A stream resuming from a previously obtained cursor. The stream
    /// adopts the cursor's scope.
    pub fn resume_change_stream(&self, cursor: ChangeCursor) -> ChangeStream<'_> {
        ChangeStream {
            scope: cursor.scope().map(str::to_string),
            filters: self,
            cursor: Some(cursor),
            state: PollState::Draining,
            caught_up_at: None,
        }
    }
}

/// Drives one cursor chain through the seed/drain/caught-up protocol.
///
/// The stream owns its cursor and advances it only on successful pages, so
/// after any logical failure the last known-good cursor is retained and
/// the failed page can simply be retried. Independent streams (e.g. one
/// per filter scope) can be driven concurrently; each owns its own cursor
/// and the service is authoritative for sequence state.
pub struct ChangeStream<'a> {
    filters: &'a EconomicFilters,
    scope: Option<String>,
    cursor: Option<ChangeCursor>,
    state: PollState,
    caught_up_at: Option<Instant>,
}

impl ChangeStream<'_> {
    pub fn state(&self) -> PollState {
        self.state
    }

    /// The last known-good cursor, if the stream has been seeded.
    pub fn cursor(&self) -> Option<&ChangeCursor> {
        self.cursor.as_ref()
    }

    /// How long until the caught-up stream may poll again. Zero whenever
    /// the stream is draining or unseeded.
    pub fn ready_in(&self) -> Duration {
        match (self.state, self.caught_up_at) {
            (PollState::CaughtUp, Some(at)) => MIN_POLL_INTERVAL.saturating_sub(at.elapsed()),
            _ => Duration::ZERO,
        }
    }

    /// Establishes the stream's cursor from a start timestamp (`None` =
    /// 00:00 of the prior weekday). On success the stream moves to
    /// `Draining` or `CaughtUp` according to the pending flag.
    pub async fn seed(&mut self, since: Option<DateTime<Utc>>) -> Result<ChangesResponse, Error> {
        let resp = self
            .filters
            .get_economic_changes_since(since, self.scope.as_deref())
            .await?;
        self.absorb(&resp);
        Ok(resp)
    }

    /// Fetches the next page of the chain and advances the cursor on
    /// success. Once caught up, polling again before [`MIN_POLL_INTERVAL`]
    /// has elapsed is refused locally without a network call.
    pub async fn next_page(&mut self) -> Result<ChangesResponse, Error> {
        let cursor = match &self.cursor {
            Some(cursor) => cursor.clone(),
            None => {
                return Ok(ChangesResponse::rejected(
                    self.scope.as_deref(),
                    FilterStatus::Error,
                    "the stream has no cursor; seed it with a start timestamp first".to_string(),
                ))
            }
        };
        let wait = self.ready_in();
        if !wait.is_zero() {
            let reason = format!(
                "the stream is caught up; poll again in {}s to honour the {}s minimum interval",
                wait.as_secs(),
                MIN_POLL_INTERVAL.as_secs()
            );
            tracing::warn!("changes poll refused: {}", reason);
            return Ok(ChangesResponse::rejected(
                self.scope.as_deref(),
                FilterStatus::Error,
                reason,
            ));
        }

        let resp = self.filters.get_economic_changes(&cursor).await?;
        self.absorb(&resp);
        Ok(resp)
    }

    /// Fetches pages until the service reports nothing further pending,
    /// returning the concatenated batch. A logical failure stops the drain
    /// with the partial batch and leaves the cursor at the last good page.
    pub async fn drain(&mut self) -> Result<ChangesBatch, Error> {
        let mut updates = Vec::new();
        loop {
            let page = self.next_page().await?;
            let done = page.response_status != FilterStatus::Success || !page.updates_pending;
            let status = page.response_status;
            let error_message = page.error_message.clone();
            updates.extend(page.updates);
            if done {
                return Ok(ChangesBatch {
                    updates,
                    response_status: status,
                    error_message,
                });
            }
        }
    }

    /// Folds a page's outcome into the stream state. Anything other than
    /// success leaves the cursor and state untouched.
    fn absorb(&mut self, resp: &ChangesResponse) {
        if resp.response_status != FilterStatus::Success {
            return;
        }
        self.cursor = resp.next.clone();
        if resp.updates_pending {
            self.state = PollState::Draining;
            self.caught_up_at = None;
        } else {
            self.state = PollState::CaughtUp;
            self.caught_up_at = Some(Instant::now());
        }
    }
}
