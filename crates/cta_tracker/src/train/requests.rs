//! Train Tracker request types

use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::models::{ArrivalsResponse, FollowResponse, PositionsResponse};
use crate::error::TrackerError;
use crate::params::{IdList, QueryParams};

/// Train Tracker v1.0 endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainEndpoint {
    Arrivals,
    Follow,
    Positions,
}

impl TrainEndpoint {
    /// Path segment under the Train Tracker base URL
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Arrivals => "ttarrivals.aspx",
            Self::Follow => "ttfollow.aspx",
            Self::Positions => "ttpositions.aspx",
        }
    }
}

/// A request to one Train Tracker endpoint
pub trait TrainQuery: Send + Sync {
    /// Typed record the endpoint's `ctatt` envelope holds
    type Response: DeserializeOwned + Serialize + Validate;

    /// Endpoint this request targets
    const ENDPOINT: TrainEndpoint;

    /// Validate the parameter combination and build the endpoint parameters
    fn to_params(&self) -> Result<QueryParams, TrackerError>;
}

fn check_five_digit(name: &str, value: &str, lead: char) -> Result<(), TrackerError> {
    let valid =
        value.len() == 5 && value.starts_with(lead) && value.bytes().all(|b| b.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(TrackerError::invalid(format!(
            "{name} must be a 5-digit number in the {lead}xxxx range, got {value:?}"
        )))
    }
}

/// `ttarrivals.aspx`: arrival predictions for a station or a platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrivalsRequest {
    /// Parent station id (4xxxx); exclusive with `stpid`
    pub mapid: Option<String>,
    /// Platform stop id (3xxxx); exclusive with `mapid`
    pub stpid: Option<String>,
    /// Maximum number of predictions
    pub max: Option<u32>,
    /// Route filter (e.g. "Red")
    pub rt: Option<String>,
}

impl ArrivalsRequest {
    /// Arrivals at every platform of a station
    pub fn for_station(mapid: impl Into<String>) -> Self {
        Self {
            mapid: Some(mapid.into()),
            ..Self::default()
        }
    }

    /// Arrivals at a single platform
    pub fn for_stop(stpid: impl Into<String>) -> Self {
        Self {
            stpid: Some(stpid.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_route(mut self, rt: impl Into<String>) -> Self {
        self.rt = Some(rt.into());
        self
    }
}

impl TrainQuery for ArrivalsRequest {
    type Response = ArrivalsResponse;
    const ENDPOINT: TrainEndpoint = TrainEndpoint::Arrivals;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        let mut params = QueryParams::new();

        match (&self.mapid, &self.stpid) {
            (Some(mapid), None) => {
                check_five_digit("mapid", mapid, '4')?;
                params.push("mapid", mapid.as_str());
            },
            (None, Some(stpid)) => {
                check_five_digit("stpid", stpid, '3')?;
                params.push("stpid", stpid.as_str());
            },
            (None, None) => return Err(TrackerError::invalid("provide either mapid or stpid")),
            (Some(_), Some(_)) => {
                return Err(TrackerError::invalid(
                    "provide either mapid or stpid, not both",
                ));
            },
        }

        if let Some(max) = self.max {
            if max == 0 {
                return Err(TrackerError::invalid("max must be a positive integer"));
            }
            params.push("max", max.to_string());
        }
        params.push_opt("rt", self.rt.as_deref());
        Ok(params)
    }
}

/// `ttfollow.aspx`: upcoming stops of one train
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowRequest {
    /// Run number of the train
    pub runnumber: String,
}

impl FollowRequest {
    pub fn new(runnumber: impl Into<String>) -> Self {
        Self {
            runnumber: runnumber.into(),
        }
    }
}

impl TrainQuery for FollowRequest {
    type Response = FollowResponse;
    const ENDPOINT: TrainEndpoint = TrainEndpoint::Follow;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        if self.runnumber.trim().is_empty() {
            return Err(TrackerError::invalid("runnumber must not be empty"));
        }

        let mut params = QueryParams::new();
        params.push("runnumber", self.runnumber.as_str());
        Ok(params)
    }
}

/// `ttpositions.aspx`: positions of every train on the given routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionsRequest {
    /// Route names (e.g. `["Red", "Blue"]` or `"Red,Blue"`)
    pub rt: IdList,
}

impl PositionsRequest {
    pub fn new(rt: impl Into<IdList>) -> Self {
        Self { rt: rt.into() }
    }
}

impl TrainQuery for PositionsRequest {
    type Response = PositionsResponse;
    const ENDPOINT: TrainEndpoint = TrainEndpoint::Positions;

    fn to_params(&self) -> Result<QueryParams, TrackerError> {
        self.rt.check("rt", usize::MAX)?;

        let mut params = QueryParams::new();
        params.push_ids("rt", &self.rt);
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(TrainEndpoint::Arrivals.path(), "ttarrivals.aspx");
        assert_eq!(FollowRequest::ENDPOINT.path(), "ttfollow.aspx");
        assert_eq!(PositionsRequest::ENDPOINT.path(), "ttpositions.aspx");
    }

    #[test]
    fn test_arrivals_params() {
        let params = ArrivalsRequest::for_station("40380")
            .with_max(5)
            .with_route("Red")
            .to_params()
            .unwrap();
        assert_eq!(params.names(), vec!["mapid", "max", "rt"]);
        assert_eq!(params.get("mapid"), Some("40380"));
        assert_eq!(params.get("max"), Some("5"));

        let params = ArrivalsRequest::for_stop("30174").to_params().unwrap();
        assert_eq!(params.names(), vec!["stpid"]);
    }

    #[test]
    fn test_arrivals_rejects_bad_identifiers() {
        for request in [
            ArrivalsRequest::default(),
            ArrivalsRequest {
                mapid: Some("40380".to_string()),
                stpid: Some("30174".to_string()),
                ..ArrivalsRequest::default()
            },
            ArrivalsRequest::for_station("30380"),
            ArrivalsRequest::for_station("4038"),
            ArrivalsRequest::for_stop("40174"),
            ArrivalsRequest::for_stop("3017a"),
            ArrivalsRequest::for_station("40380").with_max(0),
        ] {
            assert!(
                matches!(request.to_params(), Err(TrackerError::InvalidArgument(_))),
                "{request:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_follow_params() {
        let params = FollowRequest::new("831").to_params().unwrap();
        assert_eq!(params.get("runnumber"), Some("831"));
        assert!(FollowRequest::new("  ").to_params().is_err());
    }

    #[test]
    fn test_positions_joins_routes() {
        let params = PositionsRequest::new(vec!["Red", "Blue", "G"]).to_params().unwrap();
        assert_eq!(params.get("rt"), Some("Red,Blue,G"));

        let params = PositionsRequest::new("Red,Blue").to_params().unwrap();
        assert_eq!(params.get("rt"), Some("Red,Blue"));

        assert!(PositionsRequest::new("").to_params().is_err());
        assert!(PositionsRequest::new(Vec::<String>::new()).to_params().is_err());
    }
}
