//! Typed Train Tracker clients

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::warn;
use validator::Validate;

use super::client::{BlockingTrainTracker, TrainTracker};
use super::models::{ArrivalsResponse, FollowResponse, PositionsResponse, TrainApiError};
use super::requests::{ArrivalsRequest, FollowRequest, PositionsRequest, TrainQuery};
use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::params::IdList;
use crate::transport::{BlockingHttpTransport, BlockingTransport, HttpTransport, Transport};

/// Top-level key of every Train Tracker document
pub const TRAIN_ENVELOPE: &str = "ctatt";

/// Outcome of a typed train call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TrainResponse<T> {
    /// The validated record
    Success(T),
    /// Error reported by the Train Tracker
    Error(TrainApiError),
}

impl<T> TrainResponse<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(record) => Some(record),
            Self::Error(_) => None,
        }
    }

    #[must_use]
    pub const fn api_error(&self) -> Option<&TrainApiError> {
        match self {
            Self::Success(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    /// Convert into a `Result`, treating the upstream error as `Err`
    pub fn into_result(self) -> Result<T, TrainApiError> {
        match self {
            Self::Success(record) => Ok(record),
            Self::Error(error) => Err(error),
        }
    }
}

impl<T: Serialize> TrainResponse<T> {
    /// Re-wrap in the `ctatt` envelope
    pub fn to_document(&self) -> Result<Value, TrackerError> {
        let body =
            serde_json::to_value(self).map_err(|e| TrackerError::Decode(e.to_string()))?;
        Ok(json!({ TRAIN_ENVELOPE: body }))
    }
}

/// Parse a raw Train Tracker document into a validated record
pub fn parse_train_response<R>(document: Value) -> Result<TrainResponse<R>, TrackerError>
where
    R: DeserializeOwned + Validate,
{
    let Value::Object(mut root) = document else {
        return Err(TrackerError::Validation(
            "response is not a JSON object".to_string(),
        ));
    };
    let body = root
        .remove(TRAIN_ENVELOPE)
        .ok_or_else(|| TrackerError::Validation(format!("missing {TRAIN_ENVELOPE} envelope")))?;

    let failed = body
        .get("errCd")
        .and_then(Value::as_str)
        .is_some_and(|code| code != "0");
    if failed {
        let error: TrainApiError = serde_json::from_value(body)
            .map_err(|e| TrackerError::Validation(format!("malformed error envelope: {e}")))?;
        warn!(error = %error, "Train Tracker reported an error");
        return Ok(TrainResponse::Error(error));
    }

    let record: R =
        serde_json::from_value(body).map_err(|e| TrackerError::Validation(e.to_string()))?;
    record
        .validate()
        .map_err(|e| TrackerError::Validation(e.to_string()))?;

    Ok(TrainResponse::Success(record))
}

/// Async Train Tracker client returning validated records
#[derive(Debug, Clone)]
pub struct TypedTrainTracker<T = HttpTransport> {
    inner: TrainTracker<T>,
}

impl TypedTrainTracker<HttpTransport> {
    /// Create a tracker backed by reqwest
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        Ok(Self {
            inner: TrainTracker::new(config)?,
        })
    }
}

impl<T: Transport> From<TrainTracker<T>> for TypedTrainTracker<T> {
    fn from(inner: TrainTracker<T>) -> Self {
        Self { inner }
    }
}

impl<T: Transport> TypedTrainTracker<T> {
    /// Create a tracker over a custom transport
    pub fn with_transport(config: &TrackerConfig, transport: T) -> Result<Self, TrackerError> {
        Ok(Self {
            inner: TrainTracker::with_transport(config, transport)?,
        })
    }

    /// The untyped tracker underneath
    pub const fn untyped(&self) -> &TrainTracker<T> {
        &self.inner
    }

    /// Send any train request and validate the response
    pub async fn fetch<Q: TrainQuery>(
        &self,
        query: &Q,
    ) -> Result<TrainResponse<Q::Response>, TrackerError> {
        let document = self.inner.send(query).await?;
        parse_train_response(document)
    }

    pub async fn arrivals(
        &self,
        request: &ArrivalsRequest,
    ) -> Result<TrainResponse<ArrivalsResponse>, TrackerError> {
        self.fetch(request).await
    }

    pub async fn follow(
        &self,
        runnumber: &str,
    ) -> Result<TrainResponse<FollowResponse>, TrackerError> {
        self.fetch(&FollowRequest::new(runnumber)).await
    }

    pub async fn positions(
        &self,
        rt: impl Into<IdList>,
    ) -> Result<TrainResponse<PositionsResponse>, TrackerError> {
        self.fetch(&PositionsRequest::new(rt)).await
    }
}

/// Blocking Train Tracker client returning validated records
#[derive(Debug, Clone)]
pub struct BlockingTypedTrainTracker<T = BlockingHttpTransport> {
    inner: BlockingTrainTracker<T>,
}

impl BlockingTypedTrainTracker<BlockingHttpTransport> {
    /// Create a tracker backed by the blocking reqwest client
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        Ok(Self {
            inner: BlockingTrainTracker::new(config)?,
        })
    }
}

impl<T: BlockingTransport> From<BlockingTrainTracker<T>> for BlockingTypedTrainTracker<T> {
    fn from(inner: BlockingTrainTracker<T>) -> Self {
        Self { inner }
    }
}

impl<T: BlockingTransport> BlockingTypedTrainTracker<T> {
    /// Create a tracker over a custom transport
    pub fn with_transport(config: &TrackerConfig, transport: T) -> Result<Self, TrackerError> {
        Ok(Self {
            inner: BlockingTrainTracker::with_transport(config, transport)?,
        })
    }

    /// The untyped tracker underneath
    pub const fn untyped(&self) -> &BlockingTrainTracker<T> {
        &self.inner
    }

    /// Send any train request and validate the response
    pub fn fetch<Q: TrainQuery>(
        &self,
        query: &Q,
    ) -> Result<TrainResponse<Q::Response>, TrackerError> {
        parse_train_response(self.inner.send(query)?)
    }

    pub fn arrivals(
        &self,
        request: &ArrivalsRequest,
    ) -> Result<TrainResponse<ArrivalsResponse>, TrackerError> {
        self.fetch(request)
    }

    pub fn follow(&self, runnumber: &str) -> Result<TrainResponse<FollowResponse>, TrackerError> {
        self.fetch(&FollowRequest::new(runnumber))
    }

    pub fn positions(
        &self,
        rt: impl Into<IdList>,
    ) -> Result<TrainResponse<PositionsResponse>, TrackerError> {
        self.fetch(&PositionsRequest::new(rt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockBlockingTransport;

    #[test]
    fn test_parse_arrivals() {
        let document = json!({"ctatt": {
            "tmst": "2025-07-17T22:47:33",
            "errCd": "0",
            "errNm": null,
            "eta": []
        }});
        let response: TrainResponse<ArrivalsResponse> =
            parse_train_response(document.clone()).unwrap();
        assert!(response.is_success());
        assert_eq!(response.to_document().unwrap(), document);
    }

    #[test]
    fn test_parse_upstream_error_is_data() {
        let document = json!({"ctatt": {
            "tmst": "2025-07-17T22:47:33",
            "errCd": "101",
            "errNm": "Invalid API key."
        }});
        let response: TrainResponse<ArrivalsResponse> =
            parse_train_response(document.clone()).unwrap();
        let error = response.api_error().unwrap();
        assert_eq!(error.code(), Some(101));
        assert_eq!(response.to_document().unwrap(), document);
    }

    #[test]
    fn test_parse_missing_envelope_or_field() {
        let result: Result<TrainResponse<ArrivalsResponse>, _> =
            parse_train_response(json!({"bustime-response": {}}));
        assert!(matches!(result, Err(TrackerError::Validation(_))));

        let result: Result<TrainResponse<ArrivalsResponse>, _> =
            parse_train_response(json!({"ctatt": {"errCd": "0", "errNm": null}}));
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_blocking_typed_follow() {
        let mut transport = MockBlockingTransport::new();
        transport
            .expect_get()
            .withf(|request| request.query().get("runnumber") == Some("831"))
            .times(1)
            .returning(|_| {
                Ok(json!({"ctatt": {
                    "tmst": "2025-07-17T22:47:33",
                    "errCd": "0",
                    "errNm": null,
                    "position": {"lat": "41.88574", "lon": "-87.6308", "heading": "269"}
                }}))
            });

        let tracker =
            BlockingTypedTrainTracker::with_transport(&TrackerConfig::for_testing(), transport)
                .unwrap();
        let follow = tracker.follow("831").unwrap().into_result().unwrap();
        assert_eq!(
            follow.position.flatten().and_then(|p| p.heading.flatten()),
            Some("269".to_string())
        );
    }
}
