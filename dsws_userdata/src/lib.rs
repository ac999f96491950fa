//! Client for user-created timeseries and custom economic change filters on
//! the Datastream Web Service (DSWS).
//!
//! Three pieces sit on top of the [`dsws_api`] transport gateway:
//!
//! - [`TimeseriesClient`]: create, update, delete and fetch user-owned
//!   timeseries objects, plus resolution of the supported dates for a
//!   range/frequency.
//! - [`EconomicFilters`]: manage custom filters over the economic-series
//!   universe (bounded sets of series identifiers used to scope change
//!   queries).
//! - [`ChangeStream`]: the sequence-cursor protocol for polling incremental
//!   changes and corrections across the series universe without rescanning
//!   it.
//!
//! Server outcomes (permissions, not present, format errors, ...) are data
//! on the response objects; only transport failures and session-fatal
//! faults are `Err`. Every documented client-side validation runs before a
//! request is sent, so malformed input never costs a round trip.

pub mod changes;
pub mod dates;
pub mod filters;
pub mod timeseries;
pub mod types;
pub mod validation;

pub use dsws_api::{Client, Error, Settings};

pub use self::changes::{ChangeStream, MIN_POLL_INTERVAL};
pub use self::filters::EconomicFilters;
pub use self::timeseries::TimeseriesClient;
pub use self::types::{
    CarryIndicator, ChangeCursor, ChangeUpdate, ChangesBatch, ChangesResponse, DateAlignment,
    DateRangeResponse, EconomicFilter, FilterResponse, FilterStatus, FilterUpdate,
    FiltersResponse, Frequency, FrequencyConversion, GetAllAction, ItemError, NewFilter,
    PollState, Timeseries, TimeseriesRequest, UpdateFrequency, UserObjectResponse,
    UserObjectStatus, UserObjectsResponse,
};
