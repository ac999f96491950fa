//! Client-side validation for identifiers, attribute bounds and
//! constituent lists.
//!
//! Every function here is pure and runs before a request is built; a
//! failing check short-circuits the call so malformed input never costs a
//! round trip. Failures are returned as messages which the managers wrap
//! into status-bearing responses, keeping the "statuses are data" contract.

use crate::types::ItemError;

/// Identifiers with this prefix denote server-owned global filters,
/// readable by every client but never modifiable.
pub const RESERVED_FILTER_PREFIX: &str = "DATASTREAM";

/// The distinguished ~25K-series high-prominence global filter.
pub const GLOBAL_KEY_INDICATORS_FILTER: &str = "DATASTREAM_KEYIND_GLOBAL";

/// Hard bound on a filter's constituent list.
pub const MAX_FILTER_CONSTITUENTS: usize = 100_000;

const MAX_DECIMAL_PLACES: u8 = 8;
const MAX_UNITS_LEN: usize = 12;
const MAX_DISPLAY_NAME_LEN: usize = 64;
const MAX_MANAGEMENT_GROUP_LEN: usize = 10;
const MAX_FILTER_DESCRIPTION_LEN: usize = 127;

/// Non-alphanumeric characters permitted in economic series mnemonics.
const SERIES_SPECIAL_CHARS: &[char] = &['$', '&', '.', '%', '#', '£', ','];

/// Who owns a syntactically valid filter identifier. Computed once here so
/// reserved-prefix handling is a tagged classification rather than string
/// probing scattered through the managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterIdScope {
    /// A reserved, server-owned filter: readable, never modifiable.
    Global,
    /// An ordinary user-owned filter.
    UserOwned,
}

/// Timeseries identifiers are exactly 8 uppercase alphanumeric characters
/// starting with the literal `TS`. Lowercase is rejected outright rather
/// than normalized.
pub fn validate_timeseries_id(id: &str) -> Result<(), String> {
    let valid = id.len() == 8
        && id.starts_with("TS")
        && id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(format!(
            "timeseries identifiers must be 8 uppercase alphanumeric characters starting with TS, e.g. TSABC001; got '{id}'"
        ))
    }
}

pub fn validate_decimal_places(places: u8) -> Result<(), String> {
    if places <= MAX_DECIMAL_PLACES {
        Ok(())
    } else {
        Err(format!(
            "decimal places must be between 0 and {MAX_DECIMAL_PLACES}; got {places}"
        ))
    }
}

pub fn validate_units(units: &str) -> Result<(), String> {
    if units.chars().count() <= MAX_UNITS_LEN {
        Ok(())
    } else {
        Err(format!(
            "the units label must be at most {MAX_UNITS_LEN} characters; got '{units}'"
        ))
    }
}

pub fn validate_display_name(name: &str) -> Result<(), String> {
    if name.chars().count() <= MAX_DISPLAY_NAME_LEN {
        Ok(())
    } else {
        Err(format!(
            "the display name must be at most {MAX_DISPLAY_NAME_LEN} characters"
        ))
    }
}

pub fn validate_management_group(group: &str) -> Result<(), String> {
    let valid = !group.is_empty()
        && group.chars().count() <= MAX_MANAGEMENT_GROUP_LEN
        && group
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(format!(
            "the management group must be 1 to {MAX_MANAGEMENT_GROUP_LEN} uppercase alphanumeric characters; got '{group}'"
        ))
    }
}

pub fn validate_filter_description(description: &str) -> Result<(), String> {
    if description.chars().count() <= MAX_FILTER_DESCRIPTION_LEN {
        Ok(())
    } else {
        Err(format!(
            "the filter description must be at most {MAX_FILTER_DESCRIPTION_LEN} characters"
        ))
    }
}

/// Checks a filter identifier's syntax (5–45 alphanumeric or underscore
/// characters) and classifies it as reserved-global or user-owned.
pub fn classify_filter_id(id: &str) -> Result<FilterIdScope, String> {
    let len = id.chars().count();
    let valid = (5..=45).contains(&len)
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(format!(
            "the filter identifier must be between 5 and 45 characters long and contain only alphanumeric or underscore characters; got '{id}'"
        ));
    }
    if id.starts_with(RESERVED_FILTER_PREFIX) {
        Ok(FilterIdScope::Global)
    } else {
        Ok(FilterIdScope::UserOwned)
    }
}

/// Like [`classify_filter_id`], but additionally rejects reserved global
/// identifiers — used by every create/update/delete path.
pub fn validate_owned_filter_id(id: &str) -> Result<(), String> {
    match classify_filter_id(id)? {
        FilterIdScope::UserOwned => Ok(()),
        FilterIdScope::Global => Err(format!(
            "'{id}' is a reserved global filter ({RESERVED_FILTER_PREFIX}*) and cannot be created, modified or deleted"
        )),
    }
}

/// The constituent list supplied to a create/append/remove/replace call
/// must contain between 1 and 100K entries.
pub fn validate_filter_size(count: usize) -> Result<(), String> {
    if (1..=MAX_FILTER_CONSTITUENTS).contains(&count) {
        Ok(())
    } else {
        Err(format!(
            "the constituent list must contain at least one economic series with a maximum of {MAX_FILTER_CONSTITUENTS} items; got {count}"
        ))
    }
}

fn check_constituent(series: &str) -> Result<(), String> {
    let len = series.chars().count();
    if !(7..=9).contains(&len) {
        return Err("series identifiers must be 7 to 9 characters long".to_string());
    }
    match series
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !SERIES_SPECIAL_CHARS.contains(c))
    {
        Some(c) => Err(format!("series identifiers cannot contain '{c}'")),
        None => Ok(()),
    }
}

/// Splits a constituent list into the syntactically valid entries, which
/// proceed to the service, and the rejected entries with their reasons.
/// The service performs the semantic existence check on the accepted set
/// and reports its own per-item errors, which the caller merges with the
/// rejections produced here.
pub fn validate_constituents(series: &[String]) -> (Vec<String>, Vec<ItemError>) {
    let mut accepted = Vec::with_capacity(series.len());
    let mut rejected = Vec::new();
    for item in series {
        match check_constituent(item) {
            Ok(()) => accepted.push(item.clone()),
            Err(reason) => rejected.push(ItemError::new(item, reason)),
        }
    }
    (accepted, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Timeseries identifiers --

    #[test]
    fn timeseries_id_valid() {
        assert!(validate_timeseries_id("TSZZZ001").is_ok());
        assert!(validate_timeseries_id("TS123456").is_ok());
        assert!(validate_timeseries_id("TSMYTEST").is_ok());
    }

    #[test]
    fn timeseries_id_lowercase_rejected() {
        assert!(validate_timeseries_id("tszzz001").is_err());
        assert!(validate_timeseries_id("TSzzz001").is_err());
        assert!(validate_timeseries_id("Tszzz001").is_err());
    }

    #[test]
    fn timeseries_id_wrong_length_rejected() {
        assert!(validate_timeseries_id("TSABC01").is_err());
        assert!(validate_timeseries_id("TSABC0012").is_err());
        assert!(validate_timeseries_id("").is_err());
    }

    #[test]
    fn timeseries_id_wrong_prefix_rejected() {
        assert!(validate_timeseries_id("XSABC001").is_err());
        assert!(validate_timeseries_id("STABC001").is_err());
    }

    #[test]
    fn timeseries_id_special_chars_rejected() {
        assert!(validate_timeseries_id("TSABC_01").is_err());
        assert!(validate_timeseries_id("TSABC 01").is_err());
    }

    // -- Attribute bounds --

    #[test]
    fn decimal_places_bounds() {
        assert!(validate_decimal_places(0).is_ok());
        assert!(validate_decimal_places(8).is_ok());
        assert!(validate_decimal_places(9).is_err());
    }

    #[test]
    fn units_length() {
        assert!(validate_units("Billions").is_ok());
        assert!(validate_units("123456789012").is_ok());
        assert!(validate_units("1234567890123").is_err());
    }

    #[test]
    fn display_name_length() {
        assert!(validate_display_name(&"x".repeat(64)).is_ok());
        assert!(validate_display_name(&"x".repeat(65)).is_err());
    }

    #[test]
    fn management_group_format() {
        assert!(validate_management_group("GENERAL").is_ok());
        assert!(validate_management_group("GDP2024").is_ok());
        assert!(validate_management_group("general").is_err());
        assert!(validate_management_group("TOOLONGGROUP").is_err());
        assert!(validate_management_group("").is_err());
    }

    // -- Filter identifiers --

    #[test]
    fn filter_id_user_owned() {
        assert_eq!(
            classify_filter_id("MyTestFilter").unwrap(),
            FilterIdScope::UserOwned
        );
        assert_eq!(
            classify_filter_id("MY_FILTER_2024").unwrap(),
            FilterIdScope::UserOwned
        );
    }

    #[test]
    fn filter_id_reserved_prefix_is_global() {
        assert_eq!(
            classify_filter_id(GLOBAL_KEY_INDICATORS_FILTER).unwrap(),
            FilterIdScope::Global
        );
        assert_eq!(
            classify_filter_id("DATASTREAMX").unwrap(),
            FilterIdScope::Global
        );
    }

    #[test]
    fn filter_id_bad_format() {
        assert!(classify_filter_id("abcd").is_err());
        assert!(classify_filter_id(&"x".repeat(46)).is_err());
        assert!(classify_filter_id("bad-filter").is_err());
        assert!(classify_filter_id("bad filter").is_err());
    }

    #[test]
    fn owned_filter_id_rejects_global() {
        assert!(validate_owned_filter_id("MyTestFilter").is_ok());
        assert!(validate_owned_filter_id(GLOBAL_KEY_INDICATORS_FILTER).is_err());
    }

    // -- Filter size --

    #[test]
    fn filter_size_bounds() {
        assert!(validate_filter_size(0).is_err());
        assert!(validate_filter_size(1).is_ok());
        assert!(validate_filter_size(MAX_FILTER_CONSTITUENTS).is_ok());
        assert!(validate_filter_size(MAX_FILTER_CONSTITUENTS + 1).is_err());
    }

    // -- Constituents --

    #[test]
    fn constituents_accept_real_series_codes() {
        let (accepted, rejected) = validate_constituents(&[
            "USGDP...D".to_string(),
            "USGB10YR".to_string(),
            "JPEMPA&FP".to_string(),
            "LBUN%TOT".to_string(),
            "UKIMPBOPB".to_string(),
        ]);
        assert_eq!(accepted.len(), 5);
        assert!(rejected.is_empty());
    }

    #[test]
    fn constituents_split_bad_entries_without_aborting() {
        let (accepted, rejected) = validate_constituents(&[
            "USGDP...D".to_string(),
            "TOOLONGCODE".to_string(),
            "SHORT".to_string(),
            "BADCHAR!X".to_string(),
        ]);
        assert_eq!(accepted, vec!["USGDP...D".to_string()]);
        assert_eq!(rejected.len(), 3);
        assert_eq!(rejected[0].item, "TOOLONGCODE");
        assert!(rejected[0].reason.contains("7 to 9"));
        assert!(rejected[2].reason.contains('!'));
    }

    #[test]
    fn constituent_boundary_lengths() {
        let (accepted, rejected) =
            validate_constituents(&["ABCDEFG".to_string(), "ABCDEFGHI".to_string()]);
        assert_eq!(accepted.len(), 2);
        assert!(rejected.is_empty());
    }
}
