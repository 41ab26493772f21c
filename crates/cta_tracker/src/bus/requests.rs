//! Bus Tracker request types
//!
//! One struct per endpoint. Each implements [`BusQuery`], which checks the
//! parameter combination and produces the endpoint's query parameters.
//! Nothing here touches the network, so argument errors always surface
//! before a request is sent.

use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::models::{
    AgenciesResponse, DetoursResponse, DirectionsResponse, LocalesResponse, PatternsResponse,
    PredictionsResponse, RoutesResponse, RtpiDataFeedsResponse, ServiceBulletinsResponse,
    StopsResponse, TimeResponse, VehiclesResponse,
};
use crate::error::TrackerError;
use crate::params::{IdList, MAX_IDS, QueryParams, TimeResolution, flag};

/// Bus Tracker v3 endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusEndpoint {
    Time,
    RtpiDataFeeds,
    Vehicles,
    Routes,
    Directions,
    Stops,
    Patterns,
    Predictions,
    ServiceBulletins,
    LocaleList,
    Detours,
    Agencies,
}

impl BusEndpoint {
    /// Path segment under the Bus Tracker base URL
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Time => "gettime",
            Self::RtpiDataFeeds => "getrtpidatafeeds",
            Self::Vehicles => "getvehicles",
            Self::Routes => "getroutes",
            Self::Directions => "getdirections",
            Self::Stops => "getstops",
            Self::Patterns => "getpatterns",
            Self::Predictions => "getpredictions",
            Self::ServiceBulletins => "getservicebulletins",
            Self::LocaleList => "getlocalelist",
            Self::Detours => "getdetours",
            Self::Agencies => "getagencies",
        }
    }
}

/// A request to one Bus Tracker endpoint
pub trait BusQuery: Send + Sync {
    /// Typed record the endpoint's `bustime-response` envelope holds
    type Response: DeserializeOwned + Serialize + Validate;

    /// Endpoint this request targets
    const ENDPOINT: BusEndpoint;

    /// Validate the parameter combination and build the endpoint parameters
    /// (without the key/format/locale defaults)
    fn to_params(&self) -> Result<QueryParams, TrackerError>;
}

fn exactly_one<A, B>(a: Option<&A>, b: Option<&B>, message: &str) -> Result<(), TrackerError> {
    match (a, b) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(TrackerError::invalid(message)),
    }
}

fn require_text(name: &str, value: &str) -> Result<(), TrackerError> {
    if value.trim().is_empty() {
        return Err(TrackerError::invalid(format!("{name} must not be empty")));
    }
    Ok(())
}

/// `gettime`: current system time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRequest {
    /// Return epoch milliseconds instead of local time
    pub unix_time: bool,
}

impl BusQuery for TimeRequest {
    type Response = TimeResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::Time;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        let mut params = QueryParams::new();
        params.push_opt("unixTime", flag(self.unix_time));
        Ok(params)
    }
}

/// `getrtpidatafeeds`: available real-time passenger information feeds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RtpiDataFeedsRequest;

impl BusQuery for RtpiDataFeedsRequest {
    type Response = RtpiDataFeedsResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::RtpiDataFeeds;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        Ok(QueryParams::new())
    }
}

/// `getroutes`: every route serviced by the system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutesRequest;

impl BusQuery for RoutesRequest {
    type Response = RoutesResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::Routes;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        Ok(QueryParams::new())
    }
}

/// `getagencies`: agencies imported in the system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgenciesRequest;

impl BusQuery for AgenciesRequest {
    type Response = AgenciesResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::Agencies;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        Ok(QueryParams::new())
    }
}

/// `getvehicles`: positions of vehicles, by vehicle id or by route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehiclesRequest {
    /// Vehicle ids (up to 10); exclusive with `rt`
    pub vid: Option<IdList>,
    /// Route ids (up to 10); exclusive with `vid`
    pub rt: Option<IdList>,
    /// Timestamp resolution
    pub tmres: TimeResolution,
}

impl VehiclesRequest {
    /// Vehicles with the given ids
    pub fn by_vehicle(vid: impl Into<IdList>) -> Self {
        Self {
            vid: Some(vid.into()),
            ..Self::default()
        }
    }

    /// Vehicles currently running on the given routes
    pub fn by_route(rt: impl Into<IdList>) -> Self {
        Self {
            rt: Some(rt.into()),
            ..Self::default()
        }
    }

    /// Set the timestamp resolution
    #[must_use]
    pub const fn with_tmres(mut self, tmres: TimeResolution) -> Self {
        self.tmres = tmres;
        self
    }
}

impl BusQuery for VehiclesRequest {
    type Response = VehiclesResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::Vehicles;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        exactly_one(
            self.vid.as_ref(),
            self.rt.as_ref(),
            "provide either vid or rt, not both",
        )?;

        let mut params = QueryParams::new();
        if let Some(vid) = &self.vid {
            vid.check("vid", MAX_IDS)?;
            params.push_ids("vid", vid);
        }
        if let Some(rt) = &self.rt {
            rt.check("rt", MAX_IDS)?;
            params.push_ids("rt", rt);
        }
        params.push("tmres", self.tmres.as_str());
        Ok(params)
    }
}

/// `getdirections`: directions served by a single route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionsRequest {
    /// A single route id
    pub rt: IdList,
}

impl DirectionsRequest {
    pub fn new(rt: impl Into<IdList>) -> Self {
        Self { rt: rt.into() }
    }
}

impl BusQuery for DirectionsRequest {
    type Response = DirectionsResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::Directions;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        self.rt.check("rt", 1)?;

        let mut params = QueryParams::new();
        params.push_ids("rt", &self.rt);
        Ok(params)
    }
}

/// `getstops`: stops for a route and direction, or stops by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopsRequest {
    /// A single route id; requires `dir`
    pub rt: Option<IdList>,
    /// Direction of the route, as returned by `getdirections`
    pub dir: Option<String>,
    /// Stop ids (up to 10); exclusive with `rt`/`dir`
    pub stpid: Option<IdList>,
}

impl StopsRequest {
    /// Stops served by a route in one direction
    pub fn for_route(rt: impl Into<IdList>, dir: impl Into<String>) -> Self {
        Self {
            rt: Some(rt.into()),
            dir: Some(dir.into()),
            stpid: None,
        }
    }

    /// Stops with the given ids
    pub fn by_stop(stpid: impl Into<IdList>) -> Self {
        Self {
            stpid: Some(stpid.into()),
            ..Self::default()
        }
    }
}

impl BusQuery for StopsRequest {
    type Response = StopsResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::Stops;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        let mut params = QueryParams::new();

        match (&self.rt, &self.dir, &self.stpid) {
            (None, None, Some(stpid)) => {
                stpid.check("stpid", MAX_IDS)?;
                params.push_ids("stpid", stpid);
            },
            (Some(rt), Some(dir), None) => {
                rt.check("rt", 1)?;
                require_text("dir", dir)?;
                params.push_ids("rt", rt);
                params.push("dir", dir.as_str());
            },
            (Some(_), None, None) => {
                return Err(TrackerError::invalid("dir is required when rt is given"));
            },
            (None, Some(_), None) => {
                return Err(TrackerError::invalid("rt is required when dir is given"));
            },
            _ => {
                return Err(TrackerError::invalid(
                    "provide either one rt and dir, or up to 10 stpid",
                ));
            },
        }

        Ok(params)
    }
}

/// `getpatterns`: the geo-positional points that make up route patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternsRequest {
    /// Pattern ids (up to 10); exclusive with `rt`
    pub pid: Option<IdList>,
    /// Route ids (up to 10); exclusive with `pid`
    pub rt: Option<IdList>,
}

impl PatternsRequest {
    /// Patterns with the given ids
    pub fn by_pattern(pid: impl Into<IdList>) -> Self {
        Self {
            pid: Some(pid.into()),
            rt: None,
        }
    }

    /// Every active pattern of a route
    pub fn by_route(rt: impl Into<IdList>) -> Self {
        Self {
            pid: None,
            rt: Some(rt.into()),
        }
    }
}

impl BusQuery for PatternsRequest {
    type Response = PatternsResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::Patterns;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        exactly_one(
            self.pid.as_ref(),
            self.rt.as_ref(),
            "provide either pid or rt, not both",
        )?;

        let mut params = QueryParams::new();
        if let Some(pid) = &self.pid {
            pid.check("pid", MAX_IDS)?;
            params.push_ids("pid", pid);
        }
        if let Some(rt) = &self.rt {
            rt.check("rt", MAX_IDS)?;
            params.push_ids("rt", rt);
        }
        Ok(params)
    }
}

/// `getpredictions`: arrival and departure predictions for stops or vehicles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionsRequest {
    /// Stop ids (up to 10); exclusive with `vid`
    pub stpid: Option<IdList>,
    /// Route filter, only valid together with `stpid`
    pub rt: Option<IdList>,
    /// Vehicle ids (up to 10); exclusive with `stpid`
    pub vid: Option<IdList>,
    /// Maximum number of predictions; zero means no limit
    pub top: Option<u32>,
    /// Timestamp resolution
    pub tmres: TimeResolution,
}

impl PredictionsRequest {
    /// Predictions for the given stops
    pub fn for_stops(stpid: impl Into<IdList>) -> Self {
        Self {
            stpid: Some(stpid.into()),
            ..Self::default()
        }
    }

    /// Predictions for the given vehicles
    pub fn for_vehicles(vid: impl Into<IdList>) -> Self {
        Self {
            vid: Some(vid.into()),
            ..Self::default()
        }
    }

    /// Only return predictions for these routes
    #[must_use]
    pub fn with_route(mut self, rt: impl Into<IdList>) -> Self {
        self.rt = Some(rt.into());
        self
    }

    /// Return at most `top` predictions
    #[must_use]
    pub const fn with_top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Set the timestamp resolution
    #[must_use]
    pub const fn with_tmres(mut self, tmres: TimeResolution) -> Self {
        self.tmres = tmres;
        self
    }
}

impl BusQuery for PredictionsRequest {
    type Response = PredictionsResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::Predictions;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        exactly_one(
            self.stpid.as_ref(),
            self.vid.as_ref(),
            "provide either stpid or vid, not both",
        )?;

        let mut params = QueryParams::new();
        if let Some(stpid) = &self.stpid {
            stpid.check("stpid", MAX_IDS)?;
            params.push_ids("stpid", stpid);

            if let Some(rt) = &self.rt {
                rt.check("rt", MAX_IDS)?;
                params.push_ids("rt", rt);
            }
        }
        if let Some(vid) = &self.vid {
            if self.rt.is_some() {
                return Err(TrackerError::invalid("rt cannot be combined with vid"));
            }
            vid.check("vid", MAX_IDS)?;
            params.push_ids("vid", vid);
        }
        params.push_opt("top", self.top.filter(|top| *top > 0).map(|top| top.to_string()));
        params.push("tmres", self.tmres.as_str());
        Ok(params)
    }
}

/// `getservicebulletins`: service bulletins for routes or stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceBulletinsRequest {
    /// Route ids (up to 10); exclusive with `stpid`
    pub rt: Option<IdList>,
    /// Direction, only valid with exactly one route
    pub rtdir: Option<String>,
    /// Stop ids (up to 10); exclusive with `rt`
    pub stpid: Option<IdList>,
}

impl ServiceBulletinsRequest {
    /// Bulletins affecting the given routes
    pub fn for_routes(rt: impl Into<IdList>) -> Self {
        Self {
            rt: Some(rt.into()),
            ..Self::default()
        }
    }

    /// Bulletins affecting the given stops
    pub fn for_stops(stpid: impl Into<IdList>) -> Self {
        Self {
            stpid: Some(stpid.into()),
            ..Self::default()
        }
    }

    /// Narrow a single-route request to one direction
    #[must_use]
    pub fn with_direction(mut self, rtdir: impl Into<String>) -> Self {
        self.rtdir = Some(rtdir.into());
        self
    }
}

impl BusQuery for ServiceBulletinsRequest {
    type Response = ServiceBulletinsResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::ServiceBulletins;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        exactly_one(
            self.rt.as_ref(),
            self.stpid.as_ref(),
            "provide either rt or stpid, not both",
        )?;

        let mut params = QueryParams::new();
        if let Some(rt) = &self.rt {
            if let Some(rtdir) = &self.rtdir {
                rt.check("rt", 1)
                    .map_err(|_| TrackerError::invalid("rtdir requires exactly one rt"))?;
                require_text("rtdir", rtdir)?;
            }
            rt.check("rt", MAX_IDS)?;
            params.push_ids("rt", rt);
            params.push_opt("rtdir", self.rtdir.as_deref());
        }
        if let Some(stpid) = &self.stpid {
            if self.rtdir.is_some() {
                return Err(TrackerError::invalid("rtdir requires exactly one rt"));
            }
            stpid.check("stpid", MAX_IDS)?;
            params.push_ids("stpid", stpid);
        }
        Ok(params)
    }
}

/// `getlocalelist`: languages the system can answer in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocaleListRequest {
    /// Display locale names in their own language
    pub in_locale_language: bool,
}

impl BusQuery for LocaleListRequest {
    type Response = LocalesResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::LocaleList;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        let mut params = QueryParams::new();
        params.push_opt("inLocaleLanguage", flag(self.in_locale_language));
        Ok(params)
    }
}

/// `getdetours`: active detours, optionally for one route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetoursRequest {
    /// A single route id
    pub rt: Option<IdList>,
    /// Direction, only valid with `rt`
    pub rtdir: Option<String>,
    /// Data feed name (multi-feed systems only)
    pub rtpidatafeed: Option<String>,
}

impl DetoursRequest {
    /// Detours affecting one route
    pub fn for_route(rt: impl Into<IdList>) -> Self {
        Self {
            rt: Some(rt.into()),
            ..Self::default()
        }
    }

    /// Narrow a route request to one direction
    #[must_use]
    pub fn with_direction(mut self, rtdir: impl Into<String>) -> Self {
        self.rtdir = Some(rtdir.into());
        self
    }

    /// Select the data feed
    #[must_use]
    pub fn with_feed(mut self, rtpidatafeed: impl Into<String>) -> Self {
        self.rtpidatafeed = Some(rtpidatafeed.into());
        self
    }
}

impl BusQuery for DetoursRequest {
    type Response = DetoursResponse;
    const ENDPOINT: BusEndpoint = BusEndpoint::Detours;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        let mut params = QueryParams::new();

        match (&self.rt, &self.rtdir) {
            (Some(rt), rtdir) => {
                rt.check("rt", 1)?;
                params.push_ids("rt", rt);
                params.push_opt("rtdir", rtdir.as_deref());
            },
            (None, Some(_)) => {
                return Err(TrackerError::invalid("rtdir requires rt"));
            },
            (None, None) => {},
        }
        params.push_opt("rtpidatafeed", self.rtpidatafeed.as_deref());
        Ok(params)
    }
}
