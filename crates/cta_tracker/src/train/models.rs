//! Train Tracker response models
//!
//! The Train Tracker sends nearly every value as a string, including flags
//! (`"0"`/`"1"`) and coordinates. Optional keys keep their presence: a `null`
//! is written back as `null` and a missing key stays missing, and keys the
//! models do not declare are kept in `extra`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::nullable;
use crate::validation::parse_timestamp;

fn flag_set(value: &str) -> bool {
    value == "1"
}

/// An arrival prediction at a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Arrival {
    /// Parent station id (4xxxx)
    #[validate(custom(function = "crate::validation::station_id"))]
    pub sta_id: String,
    /// Platform stop id (3xxxx)
    #[validate(custom(function = "crate::validation::stop_id"))]
    pub stp_id: String,
    /// Station name
    pub sta_nm: String,
    /// Platform description (e.g. "Service toward Howard")
    pub stp_de: String,
    /// Run number
    pub rn: String,
    /// Route (e.g. "Red")
    pub rt: String,
    /// Destination station id
    pub dest_st: String,
    pub dest_nm: String,
    /// Direction code
    pub tr_dr: String,
    /// When the prediction was generated
    #[validate(custom(function = "crate::validation::train_timestamp"))]
    pub prdt: String,
    /// Predicted arrival time
    #[validate(custom(function = "crate::validation::train_timestamp"))]
    pub arr_t: String,
    pub is_app: String,
    pub is_sch: String,
    pub is_flt: String,
    pub is_dly: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub flags: Option<Option<String>>,
    #[validate(custom(function = "crate::validation::decimal_degrees"))]
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub lat: Option<Option<String>>,
    #[validate(custom(function = "crate::validation::decimal_degrees"))]
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub lon: Option<Option<String>>,
    #[validate(custom(function = "crate::validation::heading"))]
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub heading: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Arrival {
    #[must_use]
    pub fn prediction_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.prdt)
    }

    #[must_use]
    pub fn arrival_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.arr_t)
    }

    /// The train is approaching the station
    #[must_use]
    pub fn is_approaching(&self) -> bool {
        flag_set(&self.is_app)
    }

    /// The prediction comes from the schedule, not live tracking
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        flag_set(&self.is_sch)
    }

    #[must_use]
    pub fn is_delayed(&self) -> bool {
        flag_set(&self.is_dly)
    }

    /// A fault was detected that may affect the prediction
    #[must_use]
    pub fn has_fault(&self) -> bool {
        flag_set(&self.is_flt)
    }
}

/// `ttarrivals.aspx` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalsResponse {
    #[validate(custom(function = "crate::validation::train_timestamp"))]
    pub tmst: String,
    pub err_cd: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub err_nm: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub eta: Option<Option<Vec<Arrival>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArrivalsResponse {
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.tmst)
    }

    #[must_use]
    pub fn arrivals(&self) -> &[Arrival] {
        self.eta
            .as_ref()
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }
}

/// Last known position of a followed train
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TrainPosition {
    #[validate(custom(function = "crate::validation::decimal_degrees"))]
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub lat: Option<Option<String>>,
    #[validate(custom(function = "crate::validation::decimal_degrees"))]
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub lon: Option<Option<String>>,
    #[validate(custom(function = "crate::validation::heading"))]
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub heading: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `ttfollow.aspx` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    #[validate(custom(function = "crate::validation::train_timestamp"))]
    pub tmst: String,
    pub err_cd: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub err_nm: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub position: Option<Option<TrainPosition>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub eta: Option<Option<Vec<Arrival>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FollowResponse {
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.tmst)
    }

    /// Upcoming stops of the train
    #[must_use]
    pub fn arrivals(&self) -> &[Arrival] {
        self.eta
            .as_ref()
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }
}

/// A train in service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    /// Run number
    pub rn: String,
    pub dest_st: String,
    pub dest_nm: String,
    pub tr_dr: String,
    #[validate(custom(function = "crate::validation::station_id"))]
    pub next_sta_id: String,
    #[validate(custom(function = "crate::validation::stop_id"))]
    pub next_stp_id: String,
    pub next_sta_nm: String,
    #[validate(custom(function = "crate::validation::train_timestamp"))]
    pub prdt: String,
    #[validate(custom(function = "crate::validation::train_timestamp"))]
    pub arr_t: String,
    pub is_app: String,
    pub is_dly: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub flags: Option<Option<String>>,
    #[validate(custom(function = "crate::validation::decimal_degrees"))]
    pub lat: String,
    #[validate(custom(function = "crate::validation::decimal_degrees"))]
    pub lon: String,
    #[validate(custom(function = "crate::validation::heading"))]
    pub heading: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Train {
    #[must_use]
    pub fn arrival_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.arr_t)
    }

    #[must_use]
    pub fn is_approaching(&self) -> bool {
        flag_set(&self.is_app)
    }

    #[must_use]
    pub fn is_delayed(&self) -> bool {
        flag_set(&self.is_dly)
    }
}

/// Trains on one route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RoutePositions {
    /// Route name (`@name`)
    #[serde(rename = "@name")]
    pub name: String,
    /// Absent when no train is running on the route
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub train: Option<Option<Vec<Train>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoutePositions {
    #[must_use]
    pub fn trains(&self) -> &[Train] {
        self.train
            .as_ref()
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }
}

/// `ttpositions.aspx` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    #[validate(custom(function = "crate::validation::train_timestamp"))]
    pub tmst: String,
    pub err_cd: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub err_nm: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub route: Option<Option<Vec<RoutePositions>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PositionsResponse {
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.tmst)
    }

    #[must_use]
    pub fn routes(&self) -> &[RoutePositions] {
        self.route
            .as_ref()
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }
}

/// An error reported by the Train Tracker (`errCd` other than `"0"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainApiError {
    pub tmst: String,
    pub err_cd: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub err_nm: Option<Option<String>>,
    /// Anything else the envelope carried
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrainApiError {
    /// Numeric error code (e.g. 101 for an invalid key)
    #[must_use]
    pub fn code(&self) -> Option<u32> {
        self.err_cd.trim().parse().ok()
    }
}

impl std::fmt::Display for TrainApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.err_nm {
            Some(Some(name)) => write!(f, "error {}: {name}", self.err_cd),
            _ => write!(f, "error {}", self.err_cd),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn arrival_json() -> Value {
        json!({
            "staId": "40380",
            "stpId": "30174",
            "staNm": "Clark/Lake",
            "stpDe": "Service toward Loop",
            "rn": "831",
            "rt": "Brn",
            "destSt": "30182",
            "destNm": "Loop",
            "trDr": "5",
            "prdt": "2025-07-17T22:47:33",
            "arrT": "2025-07-17T22:49:33",
            "isApp": "0",
            "isSch": "0",
            "isDly": "0",
            "isFlt": "0",
            "flags": null,
            "lat": "41.88574",
            "lon": "-87.6308",
            "heading": "269"
        })
    }

    #[test]
    fn test_arrival_round_trip() {
        let value = arrival_json();
        let arrival: Arrival = serde_json::from_value(value.clone()).unwrap();
        assert!(arrival.validate().is_ok());
        assert_eq!(serde_json::to_value(&arrival).unwrap(), value);
        assert!(!arrival.is_approaching());
        assert!(!arrival.has_fault());
        let minutes = (arrival.arrival_time().unwrap() - arrival.prediction_time().unwrap())
            .num_minutes();
        assert_eq!(minutes, 2);
    }

    #[test]
    fn test_arrival_without_optional_keys_gains_no_nulls() {
        let mut value = arrival_json();
        let fields = value.as_object_mut().unwrap();
        for key in ["flags", "lat", "lon", "heading"] {
            fields.remove(key);
        }
        let arrival: Arrival = serde_json::from_value(value.clone()).unwrap();
        assert!(arrival.validate().is_ok());
        assert_eq!(arrival.flags, None);
        assert_eq!(serde_json::to_value(&arrival).unwrap(), value);
    }

    #[test]
    fn test_arrival_keeps_undeclared_keys() {
        let mut value = arrival_json();
        value["stopDirection"] = json!("S");
        let arrival: Arrival = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(arrival.extra["stopDirection"], json!("S"));
        assert_eq!(serde_json::to_value(&arrival).unwrap(), value);
    }

    #[test]
    fn test_arrival_rejects_bad_station() {
        let mut value = arrival_json();
        value["staId"] = json!("30380");
        let arrival: Arrival = serde_json::from_value(value).unwrap();
        assert!(arrival.validate().is_err());
    }

    #[test]
    fn test_arrival_flags() {
        let mut value = arrival_json();
        value["isApp"] = json!("1");
        value["isDly"] = json!("1");
        value["isSch"] = json!("1");
        let arrival: Arrival = serde_json::from_value(value).unwrap();
        assert!(arrival.is_approaching());
        assert!(arrival.is_delayed());
        assert!(arrival.is_scheduled());
    }

    #[test]
    fn test_positions_round_trip() {
        let value = json!({
            "tmst": "2025-07-17T22:47:33",
            "errCd": "0",
            "errNm": null,
            "route": [
                {"@name": "red", "train": [{
                    "rn": "804", "destSt": "30173", "destNm": "Howard", "trDr": "1",
                    "nextStaId": "40330", "nextStpId": "30064", "nextStaNm": "Grand",
                    "prdt": "2025-07-17T22:47:10", "arrT": "2025-07-17T22:48:10",
                    "isApp": "1", "isDly": "0", "flags": null,
                    "lat": "41.88322", "lon": "-87.6276", "heading": "358"
                }]},
                {"@name": "p"}
            ]
        });
        let positions: PositionsResponse = serde_json::from_value(value.clone()).unwrap();
        assert!(positions.validate().is_ok());
        assert_eq!(serde_json::to_value(&positions).unwrap(), value);
        assert_eq!(positions.routes()[0].name, "red");
        assert!(positions.routes()[0].trains()[0].is_approaching());
        assert!(positions.routes()[1].trains().is_empty());
    }

    #[test]
    fn test_follow_without_position() {
        let follow: FollowResponse = serde_json::from_value(json!({
            "tmst": "2025-07-17T22:47:33", "errCd": "0", "errNm": null
        }))
        .unwrap();
        assert!(follow.validate().is_ok());
        assert!(follow.arrivals().is_empty());
        assert!(follow.timestamp().is_some());
    }

    #[test]
    fn test_api_error_display() {
        let error: TrainApiError = serde_json::from_value(json!({
            "tmst": "2025-07-17T22:47:33", "errCd": "101", "errNm": "Invalid API key."
        }))
        .unwrap();
        assert_eq!(error.code(), Some(101));
        assert_eq!(error.to_string(), "error 101: Invalid API key.");
    }

    #[test]
    fn test_api_error_display_without_name() {
        let error: TrainApiError = serde_json::from_value(json!({
            "tmst": "2025-07-17T22:47:33", "errCd": "500", "errNm": null
        }))
        .unwrap();
        assert_eq!(error.err_nm, Some(None));
        assert_eq!(error.to_string(), "error 500");
    }
}
