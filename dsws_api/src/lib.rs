//! Low-level transport gateway for the Datastream Web Service (DSWS)
//! user-created-data and economic-filter REST endpoints.
//!
//! This crate handles the raw JSON POST protocol: token logon and renewal,
//! the `/Date(ms)/` wire date format, proxy/TLS/timeout configuration, and
//! the distinction between transport failures, session-fatal DSFaults and
//! ordinary HTTP errors. Everything domain-shaped (timeseries, filters,
//! change polling) lives in `dsws_userdata` on top of this.

mod client;
mod config;
mod errors;
pub mod jsondate;

pub use self::client::{Client, PropertyPair, ECONOMIC_FILTER_SERVICE, USER_DATA_SERVICE};
pub use self::config::Settings;
pub use self::errors::Error;
