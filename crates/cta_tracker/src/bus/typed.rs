//! Typed Bus Tracker clients
//!
//! These wrap the untyped trackers and turn the `bustime-response` envelope
//! into a validated record. An error list inside the envelope is the
//! upstream service refusing the request; it comes back as
//! [`BusResponse::Error`], not as a [`TrackerError`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::warn;
use validator::Validate;

use super::client::{BlockingBusTracker, BusTracker};
use super::models::{
    AgenciesResponse, BusApiErrors, DetoursResponse, DirectionsResponse, LocalesResponse,
    PatternsResponse, PredictionsResponse, RoutesResponse, RtpiDataFeedsResponse,
    ServiceBulletinsResponse, StopsResponse, TimeResponse, VehiclesResponse,
};
use super::requests::{
    AgenciesRequest, BusQuery, DetoursRequest, DirectionsRequest, LocaleListRequest,
    PatternsRequest, PredictionsRequest, RoutesRequest, RtpiDataFeedsRequest,
    ServiceBulletinsRequest, StopsRequest, TimeRequest, VehiclesRequest,
};
use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::transport::{BlockingHttpTransport, BlockingTransport, HttpTransport, Transport};

/// Top-level key of every Bus Tracker document
pub const BUS_ENVELOPE: &str = "bustime-response";

/// Outcome of a typed bus call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BusResponse<T> {
    /// The validated record
    Success(T),
    /// Errors reported by the Bus Tracker
    Error(BusApiErrors),
}

impl<T> BusResponse<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The record, if the call succeeded
    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(record) => Some(record),
            Self::Error(_) => None,
        }
    }

    /// The upstream errors, if any
    #[must_use]
    pub const fn api_error(&self) -> Option<&BusApiErrors> {
        match self {
            Self::Success(_) => None,
            Self::Error(errors) => Some(errors),
        }
    }

    /// Convert into a `Result`, treating upstream errors as `Err`
    pub fn into_result(self) -> Result<T, BusApiErrors> {
        match self {
            Self::Success(record) => Ok(record),
            Self::Error(errors) => Err(errors),
        }
    }
}

impl<T: Serialize> BusResponse<T> {
    /// Re-wrap in the `bustime-response` envelope
    pub fn to_document(&self) -> Result<Value, TrackerError> {
        let body =
            serde_json::to_value(self).map_err(|e| TrackerError::Decode(e.to_string()))?;
        Ok(json!({ BUS_ENVELOPE: body }))
    }
}

/// Parse a raw Bus Tracker document into a validated record
pub fn parse_bus_response<R>(document: Value) -> Result<BusResponse<R>, TrackerError>
where
    R: DeserializeOwned + Validate,
{
    let Value::Object(mut root) = document else {
        return Err(TrackerError::Validation(
            "response is not a JSON object".to_string(),
        ));
    };
    let body = root
        .remove(BUS_ENVELOPE)
        .ok_or_else(|| TrackerError::Validation(format!("missing {BUS_ENVELOPE} envelope")))?;

    if body.get("error").is_some() {
        let errors: BusApiErrors = serde_json::from_value(body)
            .map_err(|e| TrackerError::Validation(format!("malformed error list: {e}")))?;
        warn!(errors = %errors, "Bus Tracker reported an error");
        return Ok(BusResponse::Error(errors));
    }

    let record: R =
        serde_json::from_value(body).map_err(|e| TrackerError::Validation(e.to_string()))?;
    record
        .validate()
        .map_err(|e| TrackerError::Validation(e.to_string()))?;

    Ok(BusResponse::Success(record))
}

/// Async Bus Tracker client returning validated records
#[derive(Debug, Clone)]
pub struct TypedBusTracker<T = HttpTransport> {
    inner: BusTracker<T>,
}

impl TypedBusTracker<HttpTransport> {
    /// Create a tracker backed by reqwest
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        Ok(Self {
            inner: BusTracker::new(config)?,
        })
    }
}

impl<T: Transport> From<BusTracker<T>> for TypedBusTracker<T> {
    fn from(inner: BusTracker<T>) -> Self {
        Self { inner }
    }
}

impl<T: Transport> TypedBusTracker<T> {
    /// Create a tracker over a custom transport
    pub fn with_transport(config: &TrackerConfig, transport: T) -> Result<Self, TrackerError> {
        Ok(Self {
            inner: BusTracker::with_transport(config, transport)?,
        })
    }

    /// The untyped tracker underneath
    pub const fn untyped(&self) -> &BusTracker<T> {
        &self.inner
    }

    /// Send any bus request and validate the response
    pub async fn fetch<Q: BusQuery>(
        &self,
        query: &Q,
    ) -> Result<BusResponse<Q::Response>, TrackerError> {
        let document = self.inner.send(query).await?;
        parse_bus_response(document)
    }

    pub async fn get_time(
        &self,
        unix_time: bool,
    ) -> Result<BusResponse<TimeResponse>, TrackerError> {
        self.fetch(&TimeRequest { unix_time }).await
    }

    pub async fn get_rtpi_data_feeds(
        &self,
    ) -> Result<BusResponse<RtpiDataFeedsResponse>, TrackerError> {
        self.fetch(&RtpiDataFeedsRequest).await
    }

    pub async fn get_vehicles(
        &self,
        request: &VehiclesRequest,
    ) -> Result<BusResponse<VehiclesResponse>, TrackerError> {
        self.fetch(request).await
    }

    pub async fn get_routes(&self) -> Result<BusResponse<RoutesResponse>, TrackerError> {
        self.fetch(&RoutesRequest).await
    }

    pub async fn get_directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<BusResponse<DirectionsResponse>, TrackerError> {
        self.fetch(request).await
    }

    pub async fn get_stops(
        &self,
        request: &StopsRequest,
    ) -> Result<BusResponse<StopsResponse>, TrackerError> {
        self.fetch(request).await
    }

    pub async fn get_patterns(
        &self,
        request: &PatternsRequest,
    ) -> Result<BusResponse<PatternsResponse>, TrackerError> {
        self.fetch(request).await
    }

    pub async fn get_predictions(
        &self,
        request: &PredictionsRequest,
    ) -> Result<BusResponse<PredictionsResponse>, TrackerError> {
        self.fetch(request).await
    }

    pub async fn get_service_bulletins(
        &self,
        request: &ServiceBulletinsRequest,
    ) -> Result<BusResponse<ServiceBulletinsResponse>, TrackerError> {
        self.fetch(request).await
    }

    pub async fn get_locale_list(
        &self,
        in_locale_language: bool,
    ) -> Result<BusResponse<LocalesResponse>, TrackerError> {
        self.fetch(&LocaleListRequest { in_locale_language }).await
    }

    pub async fn get_detours(
        &self,
        request: &DetoursRequest,
    ) -> Result<BusResponse<DetoursResponse>, TrackerError> {
        self.fetch(request).await
    }

    pub async fn get_agencies(&self) -> Result<BusResponse<AgenciesResponse>, TrackerError> {
        self.fetch(&AgenciesRequest).await
    }
}

/// Blocking Bus Tracker client returning validated records
#[derive(Debug, Clone)]
pub struct BlockingTypedBusTracker<T = BlockingHttpTransport> {
    inner: BlockingBusTracker<T>,
}

impl BlockingTypedBusTracker<BlockingHttpTransport> {
    /// Create a tracker backed by the blocking reqwest client
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        Ok(Self {
            inner: BlockingBusTracker::new(config)?,
        })
    }
}

impl<T: BlockingTransport> From<BlockingBusTracker<T>> for BlockingTypedBusTracker<T> {
    fn from(inner: BlockingBusTracker<T>) -> Self {
        Self { inner }
    }
}

impl<T: BlockingTransport> BlockingTypedBusTracker<T> {
    /// Create a tracker over a custom transport
    pub fn with_transport(config: &TrackerConfig, transport: T) -> Result<Self, TrackerError> {
        Ok(Self {
            inner: BlockingBusTracker::with_transport(config, transport)?,
        })
    }

    /// The untyped tracker underneath
    pub const fn untyped(&self) -> &BlockingBusTracker<T> {
        &self.inner
    }

    /// Send any bus request and validate the response
    pub fn fetch<Q: BusQuery>(&self, query: &Q) -> Result<BusResponse<Q::Response>, TrackerError> {
        parse_bus_response(self.inner.send(query)?)
    }

    pub fn get_time(&self, unix_time: bool) -> Result<BusResponse<TimeResponse>, TrackerError> {
        self.fetch(&TimeRequest { unix_time })
    }

    pub fn get_rtpi_data_feeds(&self) -> Result<BusResponse<RtpiDataFeedsResponse>, TrackerError> {
        self.fetch(&RtpiDataFeedsRequest)
    }

    pub fn get_vehicles(
        &self,
        request: &VehiclesRequest,
    ) -> Result<BusResponse<VehiclesResponse>, TrackerError> {
        self.fetch(request)
    }

    pub fn get_routes(&self) -> Result<BusResponse<RoutesResponse>, TrackerError> {
        self.fetch(&RoutesRequest)
    }

    pub fn get_directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<BusResponse<DirectionsResponse>, TrackerError> {
        self.fetch(request)
    }

    pub fn get_stops(
        &self,
        request: &StopsRequest,
    ) -> Result<BusResponse<StopsResponse>, TrackerError> {
        self.fetch(request)
    }

    pub fn get_patterns(
        &self,
        request: &PatternsRequest,
    ) -> Result<BusResponse<PatternsResponse>, TrackerError> {
        self.fetch(request)
    }

    pub fn get_predictions(
        &self,
        request: &PredictionsRequest,
    ) -> Result<BusResponse<PredictionsResponse>, TrackerError> {
        self.fetch(request)
    }

    pub fn get_service_bulletins(
        &self,
        request: &ServiceBulletinsRequest,
    ) -> Result<BusResponse<ServiceBulletinsResponse>, TrackerError> {
        self.fetch(request)
    }

    pub fn get_locale_list(
        &self,
        in_locale_language: bool,
    ) -> Result<BusResponse<LocalesResponse>, TrackerError> {
        self.fetch(&LocaleListRequest { in_locale_language })
    }

    pub fn get_detours(
        &self,
        request: &DetoursRequest,
    ) -> Result<BusResponse<DetoursResponse>, TrackerError> {
        self.fetch(request)
    }

    pub fn get_agencies(&self) -> Result<BusResponse<AgenciesResponse>, TrackerError> {
        self.fetch(&AgenciesRequest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockBlockingTransport, MockTransport};

    #[test]
    fn test_parse_success() {
        let document = json!({"bustime-response": {"routes": [{"rt": "22", "rtnm": "Clark"}]}});
        let response: BusResponse<RoutesResponse> = parse_bus_response(document.clone()).unwrap();

        let routes = response.success().unwrap();
        assert_eq!(routes.list()[0].rt, "22");
        assert_eq!(response.to_document().unwrap(), document);
    }

    #[test]
    fn test_document_keeps_nulls_and_undeclared_keys() {
        let document = json!({"bustime-response": {"routes": [
            {"extra": "x", "rt": "22", "rtclr": "#336633", "rtdd": "22", "rtnm": "Clark"},
            {"rt": "36", "rtnm": "Broadway", "rtpidatafeed": null}
        ]}});
        let response: BusResponse<RoutesResponse> = parse_bus_response(document.clone()).unwrap();

        assert_eq!(response.to_document().unwrap(), document);
    }

    #[test]
    fn test_parse_upstream_error_is_data() {
        let document = json!({"bustime-response": {"error": [{"msg": "No data found for parameter"}]}});
        let response: BusResponse<PredictionsResponse> =
            parse_bus_response(document.clone()).unwrap();

        assert!(!response.is_success());
        assert_eq!(
            response.api_error().unwrap().to_string(),
            "No data found for parameter"
        );
        assert_eq!(response.to_document().unwrap(), document);
        assert!(response.into_result().is_err());
    }

    #[test]
    fn test_parse_missing_envelope() {
        let result: Result<BusResponse<TimeResponse>, _> =
            parse_bus_response(json!({"tm": "20250717 22:47:33"}));
        assert!(matches!(result, Err(TrackerError::Validation(_))));

        let result: Result<BusResponse<TimeResponse>, _> = parse_bus_response(json!([1, 2]));
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_parse_missing_field() {
        let result: Result<BusResponse<RoutesResponse>, _> =
            parse_bus_response(json!({"bustime-response": {"routes": [{"rt": "22"}]}}));
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_parse_rule_violation() {
        let result: Result<BusResponse<TimeResponse>, _> =
            parse_bus_response(json!({"bustime-response": {"tm": "yesterday"}}));
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_typed_fetch_over_mock_transport() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|request| request.endpoint() == "gettime")
            .times(1)
            .returning(|_| Ok(json!({"bustime-response": {"tm": "20250717 22:47:33"}})));

        let tracker =
            TypedBusTracker::with_transport(&TrackerConfig::for_testing(), transport).unwrap();
        let response = tracker.get_time(false).await.unwrap();
        assert!(response.success().unwrap().time().is_some());
    }

    #[tokio::test]
    async fn test_typed_missing_identifier_never_reaches_transport() {
        let mut transport = MockTransport::new();
        transport.expect_get().times(0);

        let tracker =
            TypedBusTracker::with_transport(&TrackerConfig::for_testing(), transport).unwrap();
        let result = tracker.get_predictions(&PredictionsRequest::default()).await;
        assert!(matches!(result, Err(TrackerError::InvalidArgument(_))));
    }

    #[test]
    fn test_blocking_typed_decode_error_passes_through() {
        let mut transport = MockBlockingTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Err(TrackerError::Decode("expected value".to_string())));

        let tracker =
            BlockingTypedBusTracker::with_transport(&TrackerConfig::for_testing(), transport)
                .unwrap();
        assert!(matches!(
            tracker.get_routes(),
            Err(TrackerError::Decode(_))
        ));
    }
}
