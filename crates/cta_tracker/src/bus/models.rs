//! Bus Tracker response models
//!
//! Typed views of the records inside the `bustime-response` envelope. Field
//! names are the upstream names and field types are the upstream JSON types,
//! so serializing a record gives back the document it was read from. Keys a
//! record does not declare are kept in its `extra` map, and optional keys
//! keep `null` and missing apart.
//! Constraints that serde cannot express are declared with `validator`.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use validator::{Validate, ValidationError};

use crate::nullable;
use crate::validation::parse_timestamp;

/// A field the API sends either as a JSON number or as a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(i64),
    Text(String),
}

impl NumberOrText {
    /// Integer value, parsing the text form when needed
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for NumberOrText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A boolean the API sends either as `true` or as `"true"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexBool {
    Bool(bool),
    Text(String),
}

impl FlexBool {
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => matches!(
                s.to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            ),
        }
    }
}

fn dynamic_action_code(value: &NumberOrText) -> Result<(), ValidationError> {
    match value.as_i64() {
        Some(0..=4 | 6 | 8..=10 | 12..=19) => Ok(()),
        _ => Err(ValidationError::new("dynamic_action")
            .with_message(format!("unknown dynamic action code {value}").into())),
    }
}

fn next_bus(value: &NumberOrText) -> Result<(), ValidationError> {
    let ok = match value {
        NumberOrText::Number(n) => *n >= 0,
        NumberOrText::Text(s) => s.trim().is_empty() || s.trim().parse::<u32>().is_ok(),
    };
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("nbus")
            .with_message(format!("next bus minutes must not be negative, got {value}").into()))
    }
}

/// `gettime` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TimeResponse {
    /// Local time (`YYYYMMDD HH:MM:SS`) or epoch milliseconds
    #[validate(custom(function = "crate::validation::bus_timestamp"))]
    pub tm: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TimeResponse {
    /// The local time, when it was not requested as epoch milliseconds
    #[must_use]
    pub fn time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.tm)
    }
}

/// A route serviced by the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Route {
    /// Route designator (e.g. "20" or "X20")
    pub rt: String,
    /// Common name of the route (e.g. "Madison")
    pub rtnm: String,
    /// Map color of the route line
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(custom(function = "crate::validation::hex_color"))]
    pub rtclr: Option<Option<String>>,
    /// Language-specific route designator for display
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub rtdd: Option<Option<String>>,
    /// Data feed name (multi-feed systems only)
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub rtpidatafeed: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `getroutes` payload
///
/// Depending on the deployment the list arrives as `routes` or `route`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RoutesResponse {
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub routes: Option<Option<Vec<Route>>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub route: Option<Option<Vec<Route>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoutesResponse {
    /// The routes, whichever key carried them
    #[must_use]
    pub fn list(&self) -> &[Route] {
        self.routes
            .as_ref()
            .and_then(Option::as_deref)
            .or_else(|| self.route.as_ref().and_then(Option::as_deref))
            .unwrap_or_default()
    }
}

/// A direction served by a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Direction {
    /// Direction id to pass back as `dir` (e.g. "Eastbound")
    pub id: String,
    /// Localized direction name
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `getdirections` payload, listed under `directions` or `dir`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DirectionsResponse {
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub directions: Option<Option<Vec<Direction>>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub dir: Option<Option<Vec<Direction>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DirectionsResponse {
    /// The directions, whichever key carried them
    #[must_use]
    pub fn list(&self) -> &[Direction] {
        self.directions
            .as_ref()
            .and_then(Option::as_deref)
            .or_else(|| self.dir.as_ref().and_then(Option::as_deref))
            .unwrap_or_default()
    }
}

/// A vehicle position report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Vehicle {
    /// Vehicle id (bus number)
    pub vid: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub rtpidatafeed: Option<Option<String>>,
    /// Time of the position report
    #[validate(custom(function = "crate::validation::bus_timestamp"))]
    pub tmstmp: String,
    #[validate(custom(function = "crate::validation::decimal_degrees"))]
    pub lat: String,
    #[validate(custom(function = "crate::validation::decimal_degrees"))]
    pub lon: String,
    /// Heading in degrees, 0 is north
    #[validate(custom(function = "crate::validation::heading"))]
    pub hdg: String,
    /// Pattern id of the trip being executed
    pub pid: u64,
    /// Distance in feet travelled into the pattern
    pub pdist: u64,
    pub rt: String,
    /// Destination of the current trip
    pub des: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub dly: Option<Option<bool>>,
    /// Speed in miles per hour
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub spd: Option<Option<u32>>,
    pub tablockid: String,
    pub tatripid: String,
    pub origtatripno: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub zone: Option<Option<String>>,
    /// 0 none, 1 bus, 2 ferry, 3 rail, 4 people mover
    #[validate(range(max = 4))]
    pub mode: u8,
    /// Passenger load ratio
    #[validate(custom(function = "crate::validation::passenger_load"))]
    pub psgld: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub timepointid: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence: Option<Option<u32>>,
    /// GTFS stop status: 0 stopped at, 1 incoming at, 2 in transit to
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(max = 2))]
    pub stopstatus: Option<Option<u8>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub stopid: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub gtfsseq: Option<Option<u32>>,
    /// Scheduled start, seconds past midnight
    #[validate(range(max = 86_400))]
    pub stst: u32,
    /// Scheduled start date (`yyyy-mm-dd`)
    #[validate(custom(function = "crate::validation::service_date"))]
    pub stsd: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vehicle {
    /// Time of the position report
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.tmstmp)
    }

    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.lat.trim().parse().ok()
    }

    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.lon.trim().parse().ok()
    }

    #[must_use]
    pub fn is_delayed(&self) -> bool {
        self.dly.flatten().unwrap_or(false)
    }
}

/// `getvehicles` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VehiclesResponse {
    #[validate(nested)]
    pub vehicle: Vec<Vehicle>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A bus stop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Stop {
    pub stpid: String,
    pub stpnm: String,
    #[validate(custom(function = "crate::validation::latitude"))]
    pub lat: Number,
    #[validate(custom(function = "crate::validation::longitude"))]
    pub lon: Number,
    /// Detour ids that added this stop
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub dtradd: Option<Option<Vec<String>>>,
    /// Detour ids that removed this stop
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub dtrrem: Option<Option<Vec<String>>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub gtfsseq: Option<Option<u32>>,
    /// Whether the stop is accessible
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub ada: Option<Option<bool>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `getstops` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StopsResponse {
    #[validate(nested)]
    pub stops: Vec<Stop>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An arrival or departure prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Prediction {
    /// When the prediction was generated
    #[validate(custom(function = "crate::validation::bus_timestamp"))]
    pub tmstmp: String,
    /// `A` arrival or `D` departure
    #[validate(custom(function = "crate::validation::prediction_type"))]
    pub typ: String,
    pub stpid: String,
    pub stpnm: String,
    pub vid: String,
    /// Distance in feet between the vehicle and the stop
    pub dstp: u64,
    pub rt: String,
    pub rtdd: String,
    pub rtdir: String,
    pub des: String,
    /// Predicted arrival or departure time
    #[validate(custom(function = "crate::validation::bus_timestamp"))]
    pub prdtm: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub dly: Option<Option<bool>>,
    /// Dynamic action code (`dyn`)
    #[serde(
        rename = "dyn",
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(custom(function = "dynamic_action_code"))]
    pub dynamic_action: Option<Option<NumberOrText>>,
    pub tablockid: String,
    pub tatripid: String,
    pub origtatripno: String,
    /// Minutes until arrival, `DUE` or `DLY`
    #[validate(custom(function = "crate::validation::countdown"))]
    pub prdctdn: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub zone: Option<Option<String>>,
    /// Minutes until the next bus
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(custom(function = "next_bus"))]
    pub nbus: Option<Option<NumberOrText>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(custom(function = "crate::validation::passenger_load"))]
    pub psgld: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub gtfsseq: Option<Option<u32>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(max = 86_400))]
    pub stst: Option<Option<u32>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(custom(function = "crate::validation::service_date"))]
    pub stsd: Option<Option<String>>,
    /// -1 undefined, 0 normal, 1 pickup and discharge, 2 discharge only
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = -1, max = 2))]
    pub flagstop: Option<Option<i8>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Prediction {
    /// Minutes until the vehicle reaches the stop
    ///
    /// `DUE` counts as zero; `DLY` has no estimate.
    #[must_use]
    pub fn minutes_away(&self) -> Option<u32> {
        if self.prdctdn.eq_ignore_ascii_case("due") {
            return Some(0);
        }
        self.prdctdn.parse().ok()
    }

    #[must_use]
    pub fn predicted_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.prdtm)
    }

    #[must_use]
    pub fn is_arrival(&self) -> bool {
        self.typ == "A"
    }

    #[must_use]
    pub fn is_delayed(&self) -> bool {
        self.dly.flatten().unwrap_or(false) || self.prdctdn.eq_ignore_ascii_case("dly")
    }
}

/// `getpredictions` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PredictionsResponse {
    #[validate(nested)]
    pub prd: Vec<Prediction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A point of a pattern: a stop (`S`) or a waypoint (`W`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PatternPoint {
    /// Position of the point in the pattern
    pub seq: u32,
    #[validate(custom(function = "crate::validation::point_type"))]
    pub typ: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub stpid: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub stpnm: Option<Option<String>>,
    /// Distance in feet into the pattern
    #[validate(custom(function = "crate::validation::non_negative_number"))]
    pub pdist: Number,
    #[validate(custom(function = "crate::validation::latitude"))]
    pub lat: Number,
    #[validate(custom(function = "crate::validation::longitude"))]
    pub lon: Number,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PatternPoint {
    #[must_use]
    pub fn is_stop(&self) -> bool {
        self.typ == "S"
    }
}

/// A route pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Pattern {
    #[validate(range(min = 1))]
    pub pid: u64,
    /// Length in feet
    #[validate(custom(function = "crate::validation::positive_number"))]
    pub ln: Number,
    pub rtdir: String,
    #[validate(nested)]
    pub pt: Vec<PatternPoint>,
    /// Detour id, when a detour created this pattern
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub dtrid: Option<Option<String>>,
    /// Points of the original pattern the detour replaces
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub dtrpt: Option<Option<Vec<PatternPoint>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `getpatterns` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PatternsResponse {
    #[validate(nested)]
    pub ptr: Vec<Pattern>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Route, direction or stop a bulletin applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ServiceAffected {
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub rt: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub rtdir: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub stpid: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub stpnm: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A service bulletin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ServiceBulletin {
    /// Unique bulletin name
    pub nm: String,
    /// Subject
    pub sbj: String,
    /// Full text
    pub dtl: String,
    /// Short text
    pub brf: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub cse: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub efct: Option<Option<String>>,
    /// `High`, `Medium` or `Low`
    #[validate(custom(function = "crate::validation::priority"))]
    pub prty: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub rtpidatafeed: Option<Option<String>>,
    #[validate(nested)]
    pub srvc: Vec<ServiceAffected>,
    /// Last modification time (`mod`), may be blank
    #[serde(
        rename = "mod",
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(custom(function = "crate::validation::optional_bus_timestamp"))]
    pub modified: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `getservicebulletins` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ServiceBulletinsResponse {
    #[validate(nested)]
    pub sb: Vec<ServiceBulletin>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A real-time passenger information feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RtpiDataFeed {
    /// Value to pass as `rtpidatafeed`
    pub name: String,
    pub source: String,
    pub displayname: String,
    pub enabled: FlexBool,
    pub visible: FlexBool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `getrtpidatafeeds` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RtpiDataFeedsResponse {
    #[validate(nested)]
    pub rtpidatafeeds: Vec<RtpiDataFeed>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Route and direction affected by a detour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RouteDirection {
    pub rt: String,
    pub dir: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A detour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Detour {
    pub id: String,
    /// Only the newest version of each detour is returned
    #[validate(range(min = 1))]
    pub ver: u32,
    /// 1 active, 0 canceled
    #[validate(range(max = 1))]
    pub st: u8,
    pub desc: String,
    #[validate(nested)]
    pub rtdirs: Vec<RouteDirection>,
    pub startdt: String,
    pub enddt: String,
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub rtpidatafeed: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Detour {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.st == 1
    }
}

/// `getdetours` payload; `dtr` is absent when no detour is active
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DetoursResponse {
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub dtr: Option<Option<Vec<Detour>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DetoursResponse {
    #[must_use]
    pub fn detours(&self) -> &[Detour] {
        self.dtr
            .as_ref()
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }
}

/// An agency imported in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Agency {
    #[serde(
        default,
        deserialize_with = "nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 1))]
    pub agencyid: Option<Option<u32>>,
    pub shortname: String,
    pub longname: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `getagencies` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AgenciesResponse {
    #[validate(nested)]
    pub agency: Vec<Agency>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A language the system can answer in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Locale {
    pub localestring: String,
    pub displayname: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `getlocalelist` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LocalesResponse {
    #[validate(nested)]
    pub locale: Vec<Locale>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One error reported inside the envelope
///
/// Besides `msg`, the API echoes the offending parameter (`rt`, `stpid`,
/// ...); those are kept in `context`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusApiError {
    pub msg: String,
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

/// Errors the Bus Tracker reported instead of, or next to, a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusApiErrors {
    pub error: Vec<BusApiError>,
    /// Partial results returned alongside the errors
    #[serde(flatten)]
    pub partial: Map<String, Value>,
}

impl BusApiErrors {
    /// All error messages
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.error.iter().map(|e| e.msg.as_str())
    }
}

impl fmt::Display for BusApiErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.messages().collect();
        f.write_str(&messages.join("; "))
    }
}
