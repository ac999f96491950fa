//! Vocabularies shared by every user-created object type.

use std::fmt;

use super::wire_enum;

wire_enum! {
    /// The user-created object types the service recognises. Only
    /// `TimeSeries` is driven by this crate; the others appear in responses
    /// when a query names the wrong type.
    UserObjectType {
        NoType = 0,
        List = 1,
        Index = 2,
        TimeSeries = 3,
        Expression = 4,
        Regression = 5,
    }
    fallback NoType
}

impl Default for UserObjectType {
    fn default() -> Self {
        Self::NoType
    }
}

wire_enum! {
    /// Outcome of a user-object request. Carried as data on the response,
    /// never raised; callers branch on it.
    UserObjectStatus {
        /// The request succeeded and the response carries the object
        /// (except for deletes and skip-retrieval calls).
        Success = 0,
        /// The account is not permissioned for user-created objects.
        Permissions = 1,
        /// The requested identifier does not exist.
        NotPresent = 2,
        /// The request (or one of its fields) is not in the correct format.
        /// Also used for every client-side validation rejection.
        FormatError = 3,
        /// The supplied object does not match the requested object type.
        TypeError = 4,
        /// Any other failure, e.g. exceeding the per-account object quota.
        Error = 5,
    }
    fallback Error
}

impl Default for UserObjectStatus {
    fn default() -> Self {
        Self::Success
    }
}

impl fmt::Display for UserObjectStatus {
    /// Renders the service's own status names, as they appear in its
    /// documentation and diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "UserObjectSuccess",
            Self::Permissions => "UserObjectPermissions",
            Self::NotPresent => "UserObjectNotPresent",
            Self::FormatError => "UserObjectFormatError",
            Self::TypeError => "UserObjectTypeError",
            Self::Error => "UserObjectError",
        })
    }
}

wire_enum! {
    /// Reporting frequency of a timeseries.
    Frequency {
        Daily = 0,
        Weekly = 1,
        Monthly = 2,
        Quarterly = 3,
        Yearly = 4,
    }
    fallback Daily
}

impl Default for Frequency {
    fn default() -> Self {
        Self::Daily
    }
}

wire_enum! {
    /// How an object is shared. User timeseries are always
    /// `PrivateUserGroup` (visible to all children of the owning parent
    /// account).
    ShareType {
        NoType = 0,
        Company = 1,
        PrivateUserGroup = 2,
        UserGroup = 3,
        Global = 4,
    }
    fallback NoType
}

impl Default for ShareType {
    fn default() -> Self {
        Self::PrivateUserGroup
    }
}

wire_enum! {
    /// Whether the caller may modify the object. Only reserved global
    /// objects come back read-only.
    AccessRight {
        ReadWrite = 0,
        Read = 1,
    }
    fallback ReadWrite
}

impl Default for AccessRight {
    fn default() -> Self {
        Self::ReadWrite
    }
}
