//! Codec for the WCF-style `/Date(ms)/` wire format used by the service.
//!
//! All wire datetimes are milliseconds since the Unix epoch, UTC. Responses
//! may carry a trailing `+HHMM`/`-HHMM` offset; the offset is display
//! metadata and is ignored, the millisecond count is already UTC.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Renders a datetime as `/Date(ms)/`.
pub fn to_wire(dt: DateTime<Utc>) -> String {
    format!("/Date({})/", dt.timestamp_millis())
}

/// Renders a plain date as `/Date(ms)/` at midnight UTC.
pub fn naive_to_wire(date: NaiveDate) -> String {
    to_wire(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Parses `/Date(ms)/` or `/Date(ms±HHMM)/`.
pub fn from_wire(text: &str) -> Option<DateTime<Utc>> {
    let inner = text.strip_prefix("/Date(")?.strip_suffix(")/")?;
    // A leading '-' belongs to the millisecond count; a later '+'/'-'
    // introduces the ignored offset suffix.
    let split = inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i)
        .unwrap_or(inner.len());
    let millis: i64 = inner[..split].parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Serde adaptor for mandatory `DateTime<Utc>` fields.
pub mod utc {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&super::to_wire(*dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(de)?;
        super::from_wire(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid JSON date: {text}")))
    }
}

/// Serde adaptor for optional `DateTime<Utc>` fields.
pub mod opt_utc {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<Utc>>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => ser.serialize_str(&super::to_wire(*dt)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(de)? {
            None => Ok(None),
            Some(text) => super::from_wire(&text)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid JSON date: {text}"))),
        }
    }
}

/// Serde adaptor for `NaiveDate` fields (midnight UTC on the wire).
pub mod naive {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&super::naive_to_wire(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(de)?;
        super::from_wire(&text)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| de::Error::custom(format!("invalid JSON date: {text}")))
    }
}

/// Serde adaptor for nullable lists of dates (`"Dates": null` or an array
/// of wire date strings).
pub mod naive_dates {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dates: &Option<Vec<NaiveDate>>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        match dates {
            None => ser.serialize_none(),
            Some(dates) => {
                ser.collect_seq(dates.iter().map(|date| super::naive_to_wire(*date)))
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<Vec<NaiveDate>>, D::Error> {
        let texts = match Option::<Vec<String>>::deserialize(de)? {
            None => return Ok(None),
            Some(texts) => texts,
        };
        texts
            .into_iter()
            .map(|text| {
                super::from_wire(&text)
                    .map(|dt| dt.date_naive())
                    .ok_or_else(|| de::Error::custom(format!("invalid JSON date: {text}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn round_trip_epoch() {
        assert_eq!(to_wire(from_wire("/Date(0)/").unwrap()), "/Date(0)/");
    }

    #[test]
    fn parses_positive_millis() {
        let dt = from_wire("/Date(1640995200000)/").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
    }

    #[test]
    fn parses_negative_millis() {
        let dt = from_wire("/Date(-86400000)/").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(1969, 12, 31).unwrap());
    }

    #[test]
    fn ignores_offset_suffix() {
        let plain = from_wire("/Date(1640995200000)/").unwrap();
        assert_eq!(from_wire("/Date(1640995200000+0100)/").unwrap(), plain);
        assert_eq!(from_wire("/Date(1640995200000-0500)/").unwrap(), plain);
    }

    #[test]
    fn rejects_garbage() {
        assert!(from_wire("2022-01-01").is_none());
        assert!(from_wire("/Date()/").is_none());
        assert!(from_wire("/Date(abc)/").is_none());
    }

    #[test]
    fn naive_dates_serialize_as_midnight() {
        let date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        assert_eq!(naive_to_wire(date), "/Date(1640995200000)/");
    }
}
