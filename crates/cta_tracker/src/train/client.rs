//! Train Tracker clients

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;

use super::requests::{ArrivalsRequest, FollowRequest, PositionsRequest, TrainQuery};
use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::params::{IdList, QueryParams};
use crate::transport::{
    ApiRequest, BlockingHttpTransport, BlockingTransport, HttpTransport, Transport, endpoint_url,
};

#[derive(Debug, Clone)]
struct TrainApi {
    base_url: String,
    api_key: SecretString,
}

impl TrainApi {
    fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self {
            base_url: config.train_base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn request<Q: TrainQuery>(&self, query: &Q) -> Result<ApiRequest, TrackerError> {
        let endpoint_params = query.to_params()?;

        let mut params = QueryParams::new();
        params.push("key", self.api_key.expose_secret());
        params.push("outputType", "JSON");
        params.extend(endpoint_params);

        Ok(ApiRequest::new(
            endpoint_url(&self.base_url, Q::ENDPOINT.path()),
            params,
        ))
    }
}

/// Async Train Tracker client
///
/// # Examples
///
/// ```no_run
/// use cta_tracker::{TrackerConfig, TrainTracker};
/// use cta_tracker::train::ArrivalsRequest;
///
/// # async fn run() -> Result<(), cta_tracker::TrackerError> {
/// let tracker = TrainTracker::new(&TrackerConfig::new("my-key"))?;
/// let body = tracker.arrivals(&ArrivalsRequest::for_station("40380")).await?;
/// println!("{body}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TrainTracker<T = HttpTransport> {
    api: TrainApi,
    transport: T,
}

impl TrainTracker<HttpTransport> {
    /// Create a tracker backed by reqwest
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        Self::with_transport(config, HttpTransport::new(config)?)
    }
}

impl<T: Transport> TrainTracker<T> {
    /// Create a tracker over a custom transport
    pub fn with_transport(config: &TrackerConfig, transport: T) -> Result<Self, TrackerError> {
        Ok(Self {
            api: TrainApi::new(config)?,
            transport,
        })
    }

    /// Send any train request and return the raw JSON body
    #[instrument(skip(self, query), fields(endpoint = Q::ENDPOINT.path()))]
    pub async fn send<Q: TrainQuery>(&self, query: &Q) -> Result<Value, TrackerError> {
        let request = self.api.request(query)?;
        self.transport.get(&request).await
    }

    /// `ttarrivals.aspx`
    pub async fn arrivals(&self, request: &ArrivalsRequest) -> Result<Value, TrackerError> {
        self.send(request).await
    }

    /// `ttfollow.aspx`
    pub async fn follow(&self, runnumber: &str) -> Result<Value, TrackerError> {
        self.send(&FollowRequest::new(runnumber)).await
    }

    /// `ttpositions.aspx`
    pub async fn positions(&self, rt: impl Into<IdList>) -> Result<Value, TrackerError> {
        self.send(&PositionsRequest::new(rt)).await
    }
}

/// Blocking Train Tracker client
///
/// Do not use it from inside an async runtime; use [`TrainTracker`] there.
#[derive(Debug, Clone)]
pub struct BlockingTrainTracker<T = BlockingHttpTransport> {
    api: TrainApi,
    transport: T,
}

impl BlockingTrainTracker<BlockingHttpTransport> {
    /// Create a tracker backed by the blocking reqwest client
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        Self::with_transport(config, BlockingHttpTransport::new(config)?)
    }
}

impl<T: BlockingTransport> BlockingTrainTracker<T> {
    /// Create a tracker over a custom transport
    pub fn with_transport(config: &TrackerConfig, transport: T) -> Result<Self, TrackerError> {
        Ok(Self {
            api: TrainApi::new(config)?,
            transport,
        })
    }

    /// Send any train request and return the raw JSON body
    #[instrument(skip(self, query), fields(endpoint = Q::ENDPOINT.path()))]
    pub fn send<Q: TrainQuery>(&self, query: &Q) -> Result<Value, TrackerError> {
        let request = self.api.request(query)?;
        self.transport.get(&request)
    }

    /// `ttarrivals.aspx`
    pub fn arrivals(&self, request: &ArrivalsRequest) -> Result<Value, TrackerError> {
        self.send(request)
    }

    /// `ttfollow.aspx`
    pub fn follow(&self, runnumber: &str) -> Result<Value, TrackerError> {
        self.send(&FollowRequest::new(runnumber))
    }

    /// `ttpositions.aspx`
    pub fn positions(&self, rt: impl Into<IdList>) -> Result<Value, TrackerError> {
        self.send(&PositionsRequest::new(rt))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::{MockBlockingTransport, MockTransport};

    #[test]
    fn test_request_defaults() {
        let api = TrainApi::new(&TrackerConfig::for_testing()).unwrap();
        let request = api.request(&FollowRequest::new("831")).unwrap();

        assert_eq!(
            request.url(),
            "https://lapi.transitchicago.com/api/1.0/ttfollow.aspx"
        );
        assert_eq!(
            request.query().names(),
            vec!["key", "outputType", "runnumber"]
        );
        assert_eq!(request.query().get("outputType"), Some("JSON"));
    }

    #[tokio::test]
    async fn test_missing_identifier_never_reaches_transport() {
        let mut transport = MockTransport::new();
        transport.expect_get().times(0);

        let tracker =
            TrainTracker::with_transport(&TrackerConfig::for_testing(), transport).unwrap();

        assert!(matches!(
            tracker.arrivals(&ArrivalsRequest::default()).await,
            Err(TrackerError::InvalidArgument(_))
        ));
        assert!(matches!(
            tracker.follow("").await,
            Err(TrackerError::InvalidArgument(_))
        ));
        assert!(matches!(
            tracker.positions(Vec::<String>::new()).await,
            Err(TrackerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_blocking_positions_query() {
        let mut transport = MockBlockingTransport::new();
        transport
            .expect_get()
            .withf(|request| {
                request.endpoint() == "ttpositions.aspx"
                    && request.query().get("rt") == Some("Red,Blue")
            })
            .times(1)
            .returning(|_| Ok(json!({"ctatt": {"tmst": "2025-07-17T22:47:33", "errCd": "0"}})));

        let tracker =
            BlockingTrainTracker::with_transport(&TrackerConfig::for_testing(), transport)
                .unwrap();
        let body = tracker.positions(["Red", "Blue"]).unwrap();
        assert_eq!(body["ctatt"]["errCd"], json!("0"));
    }
}
