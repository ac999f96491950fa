//! Wire and result types shared by the managers.
//!
//! The service encodes its enums as integers. `wire_enum!` generates the
//! serde conversions for those vocabularies; unknown discriminants coming
//! back from the service degrade to the named fallback variant rather than
//! failing the whole response decode.

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
        fallback $fallback:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(from = "i64", into = "i64")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                match value {
                    $($value => Self::$variant,)+
                    _ => Self::$fallback,
                }
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> i64 {
                match value {
                    $(<$name>::$variant => $value,)+
                }
            }
        }
    };
}

pub(crate) use wire_enum;

mod changes;
pub use self::changes::{
    ChangeCursor, ChangeUpdate, ChangesBatch, ChangesResponse, PollState, UpdateFrequency,
};
pub(crate) use self::changes::WireChangesResponse;

mod common;
pub use self::common::{AccessRight, Frequency, ShareType, UserObjectStatus, UserObjectType};

mod filter;
pub use self::filter::{
    EconomicFilter, FilterResponse, FilterStatus, FilterUpdate, FiltersResponse, GetAllAction,
    ItemError, NewFilter,
};

mod timeseries;
pub use self::timeseries::{
    CarryIndicator, DateAlignment, DateInfo, DateRangeData, DateRangeResponse,
    FrequencyConversion, Timeseries, TimeseriesRequest, UserObjectResponse, UserObjectsResponse,
};
