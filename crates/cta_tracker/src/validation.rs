//! Field rules shared by the typed response models
//!
//! Every function here is plugged into a `#[validate(custom(...))]`
//! attribute. The values themselves are kept exactly as the API sent them;
//! these rules only decide whether they are acceptable.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Number;
use validator::ValidationError;

const CTA_FORMATS: [&str; 2] = ["%Y%m%d %H:%M:%S", "%Y%m%d %H:%M"];
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn invalid(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

/// Parse a CTA timestamp (`YYYYMMDD HH:MM[:SS]` or ISO `YYYY-MM-DDTHH:MM:SS`)
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    CTA_FORMATS
        .iter()
        .chain(std::iter::once(&ISO_FORMAT))
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Bus timestamps: `YYYYMMDD HH:MM[:SS]`, or epoch milliseconds when
/// `unixTime=true` was requested
pub(crate) fn bus_timestamp(value: &str) -> Result<(), ValidationError> {
    let is_epoch = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
    let is_local = CTA_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok());

    if is_epoch || is_local {
        Ok(())
    } else {
        Err(invalid(
            "timestamp",
            format!("expected YYYYMMDD HH:MM[:SS] or epoch milliseconds, got {value:?}"),
        ))
    }
}

/// Bulletin modification time: `YYYYMMDD HH:MM:SS`, blank allowed
pub(crate) fn optional_bus_timestamp(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    bus_timestamp(value)
}

/// Train timestamps: ISO `YYYY-MM-DDTHH:MM:SS` or `YYYYMMDD HH:MM:SS`
pub(crate) fn train_timestamp(value: &str) -> Result<(), ValidationError> {
    if parse_timestamp(value).is_some() {
        Ok(())
    } else {
        Err(invalid(
            "timestamp",
            format!("expected YYYY-MM-DDTHH:MM:SS or YYYYMMDD HH:MM:SS, got {value:?}"),
        ))
    }
}

/// Service date `yyyy-mm-dd`
pub(crate) fn service_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| invalid("service_date", format!("expected yyyy-mm-dd, got {value:?}")))
}

/// Route color, six hex digits with or without a leading `#`
pub(crate) fn hex_color(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(invalid("hex_color", format!("invalid hex color {value:?}")))
    }
}

/// A coordinate sent as a decimal string
pub(crate) fn decimal_degrees(value: &str) -> Result<(), ValidationError> {
    value
        .trim()
        .parse::<f64>()
        .map(|_| ())
        .map_err(|_| invalid("coordinate", format!("not a decimal number: {value:?}")))
}

/// Latitude in WGS 84 decimal degrees
pub(crate) fn latitude(value: &Number) -> Result<(), ValidationError> {
    match value.as_f64() {
        Some(lat) if (-90.0..=90.0).contains(&lat) => Ok(()),
        _ => Err(invalid("latitude", format!("latitude out of range: {value}"))),
    }
}

/// Longitude in WGS 84 decimal degrees
pub(crate) fn longitude(value: &Number) -> Result<(), ValidationError> {
    match value.as_f64() {
        Some(lon) if (-180.0..=180.0).contains(&lon) => Ok(()),
        _ => Err(invalid("longitude", format!("longitude out of range: {value}"))),
    }
}

/// A numeric distance or length that must be strictly positive
pub(crate) fn positive_number(value: &Number) -> Result<(), ValidationError> {
    match value.as_f64() {
        Some(n) if n > 0.0 => Ok(()),
        _ => Err(invalid("positive", format!("must be positive, got {value}"))),
    }
}

/// A numeric distance that must not be negative
pub(crate) fn non_negative_number(value: &Number) -> Result<(), ValidationError> {
    match value.as_f64() {
        Some(n) if n >= 0.0 => Ok(()),
        _ => Err(invalid("non_negative", format!("must not be negative, got {value}"))),
    }
}

/// Heading sent as an integer string in 0..=360
pub(crate) fn heading(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<u16>() {
        Ok(degrees) if degrees <= 360 => Ok(()),
        Ok(degrees) => Err(invalid(
            "heading",
            format!("heading must be between 0 and 360, got {degrees}"),
        )),
        Err(_) => Err(invalid("heading", format!("heading must be an integer, got {value:?}"))),
    }
}

/// Passenger load ratio; blank is accepted and means unknown
pub(crate) fn passenger_load(value: &str) -> Result<(), ValidationError> {
    match value {
        "FULL" | "HALF_EMPTY" | "EMPTY" | "N/A" | "" => Ok(()),
        other => Err(invalid(
            "passenger_load",
            format!("expected FULL, HALF_EMPTY, EMPTY or N/A, got {other:?}"),
        )),
    }
}

/// Prediction type: `A`rrival or `D`eparture
pub(crate) fn prediction_type(value: &str) -> Result<(), ValidationError> {
    match value {
        "A" | "D" => Ok(()),
        other => Err(invalid(
            "prediction_type",
            format!("expected 'A' or 'D', got {other:?}"),
        )),
    }
}

/// Countdown: whole minutes, `DUE` or `DLY`
pub(crate) fn countdown(value: &str) -> Result<(), ValidationError> {
    if value.eq_ignore_ascii_case("due") || value.eq_ignore_ascii_case("dly") {
        return Ok(());
    }
    value
        .parse::<u32>()
        .map(|_| ())
        .map_err(|_| invalid("countdown", format!("expected minutes, DUE or DLY, got {value:?}")))
}

/// Pattern point type: `S`top or `W`aypoint
pub(crate) fn point_type(value: &str) -> Result<(), ValidationError> {
    match value {
        "S" | "W" => Ok(()),
        other => Err(invalid("point_type", format!("expected 'S' or 'W', got {other:?}"))),
    }
}

/// Service bulletin priority
pub(crate) fn priority(value: &str) -> Result<(), ValidationError> {
    match value {
        "High" | "Medium" | "Low" => Ok(()),
        other => Err(invalid(
            "priority",
            format!("expected High, Medium or Low, got {other:?}"),
        )),
    }
}

fn five_digits_starting_with(value: &str, lead: char) -> bool {
    value.len() == 5 && value.starts_with(lead) && value.bytes().all(|b| b.is_ascii_digit())
}

/// Train parent station id (4xxxx)
pub(crate) fn station_id(value: &str) -> Result<(), ValidationError> {
    if five_digits_starting_with(value, '4') {
        Ok(())
    } else {
        Err(invalid("station_id", format!("expected 4xxxx, got {value:?}")))
    }
}

/// Train platform stop id (3xxxx)
pub(crate) fn stop_id(value: &str) -> Result<(), ValidationError> {
    if five_digits_starting_with(value, '3') {
        Ok(())
    } else {
        Err(invalid("stop_id", format!("expected 3xxxx, got {value:?}")))
    }
}
