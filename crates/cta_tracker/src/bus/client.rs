//! Bus Tracker clients
//!
//! [`BusTracker`] is the async client, [`BlockingBusTracker`] the blocking
//! one. Both build requests the same way and return the decoded JSON body
//! untouched.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;

use super::requests::{
    AgenciesRequest, BusQuery, DetoursRequest, DirectionsRequest, LocaleListRequest,
    PatternsRequest, PredictionsRequest, RoutesRequest, RtpiDataFeedsRequest,
    ServiceBulletinsRequest, StopsRequest, TimeRequest, VehiclesRequest,
};
use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::params::QueryParams;
use crate::transport::{
    ApiRequest, BlockingHttpTransport, BlockingTransport, HttpTransport, Transport, endpoint_url,
};

/// Endpoint root plus the parameters sent with every bus request
#[derive(Debug, Clone)]
struct BusApi {
    base_url: String,
    api_key: SecretString,
    locale: String,
}

impl BusApi {
    fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self {
            base_url: config.bus_base_url.clone(),
            api_key: config.api_key.clone(),
            locale: config.locale.clone(),
        })
    }

    fn request<Q: BusQuery>(&self, query: &Q) -> Result<ApiRequest, TrackerError> {
        let endpoint_params = query.to_params()?;

        let mut params = QueryParams::new();
        params.push("key", self.api_key.expose_secret());
        params.push("format", "json");
        params.push("locale", self.locale.as_str());
        params.extend(endpoint_params);

        Ok(ApiRequest::new(
            endpoint_url(&self.base_url, Q::ENDPOINT.path()),
            params,
        ))
    }
}

/// Async Bus Tracker client
///
/// # Examples
///
/// ```no_run
/// use cta_tracker::{BusTracker, TrackerConfig};
/// use cta_tracker::bus::PredictionsRequest;
///
/// # async fn run() -> Result<(), cta_tracker::TrackerError> {
/// let tracker = BusTracker::new(&TrackerConfig::new("my-key"))?;
/// let body = tracker
///     .send(&PredictionsRequest::for_stops("1001").with_top(3))
///     .await?;
/// println!("{body}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BusTracker<T = HttpTransport> {
    api: BusApi,
    transport: T,
}

impl BusTracker<HttpTransport> {
    /// Create a tracker backed by reqwest
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        Self::with_transport(config, HttpTransport::new(config)?)
    }
}

impl<T: Transport> BusTracker<T> {
    /// Create a tracker over a custom transport
    pub fn with_transport(config: &TrackerConfig, transport: T) -> Result<Self, TrackerError> {
        Ok(Self {
            api: BusApi::new(config)?,
            transport,
        })
    }

    /// Send any bus request and return the raw JSON body
    #[instrument(skip(self, query), fields(endpoint = Q::ENDPOINT.path()))]
    pub async fn send<Q: BusQuery>(&self, query: &Q) -> Result<Value, TrackerError> {
        let request = self.api.request(query)?;
        self.transport.get(&request).await
    }

    /// `gettime`
    pub async fn get_time(&self, unix_time: bool) -> Result<Value, TrackerError> {
        self.send(&TimeRequest { unix_time }).await
    }

    /// `getrtpidatafeeds`
    pub async fn get_rtpi_data_feeds(&self) -> Result<Value, TrackerError> {
        self.send(&RtpiDataFeedsRequest).await
    }

    /// `getvehicles`
    pub async fn get_vehicles(&self, request: &VehiclesRequest) -> Result<Value, TrackerError> {
        self.send(request).await
    }

    /// `getroutes`
    pub async fn get_routes(&self) -> Result<Value, TrackerError> {
        self.send(&RoutesRequest).await
    }

    /// `getdirections`
    pub async fn get_directions(&self, request: &DirectionsRequest) -> Result<Value, TrackerError> {
        self.send(request).await
    }

    /// `getstops`
    pub async fn get_stops(&self, request: &StopsRequest) -> Result<Value, TrackerError> {
        self.send(request).await
    }

    /// `getpatterns`
    pub async fn get_patterns(&self, request: &PatternsRequest) -> Result<Value, TrackerError> {
        self.send(request).await
    }

    /// `getpredictions`
    pub async fn get_predictions(
        &self,
        request: &PredictionsRequest,
    ) -> Result<Value, TrackerError> {
        self.send(request).await
    }

    /// `getservicebulletins`
    pub async fn get_service_bulletins(
        &self,
        request: &ServiceBulletinsRequest,
    ) -> Result<Value, TrackerError> {
        self.send(request).await
    }

    /// `getlocalelist`
    pub async fn get_locale_list(&self, in_locale_language: bool) -> Result<Value, TrackerError> {
        self.send(&LocaleListRequest { in_locale_language }).await
    }

    /// `getdetours`
    pub async fn get_detours(&self, request: &DetoursRequest) -> Result<Value, TrackerError> {
        self.send(request).await
    }

    /// `getagencies`
    pub async fn get_agencies(&self) -> Result<Value, TrackerError> {
        self.send(&AgenciesRequest).await
    }
}

/// Blocking Bus Tracker client
///
/// Runs each request to completion on the calling thread. Do not use it
/// from inside an async runtime; use [`BusTracker`] there.
#[derive(Debug, Clone)]
pub struct BlockingBusTracker<T = BlockingHttpTransport> {
    api: BusApi,
    transport: T,
}

impl BlockingBusTracker<BlockingHttpTransport> {
    /// Create a tracker backed by the blocking reqwest client
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        Self::with_transport(config, BlockingHttpTransport::new(config)?)
    }
}

impl<T: BlockingTransport> BlockingBusTracker<T> {
    /// Create a tracker over a custom transport
    pub fn with_transport(config: &TrackerConfig, transport: T) -> Result<Self, TrackerError> {
        Ok(Self {
            api: BusApi::new(config)?,
            transport,
        })
    }

    /// Send any bus request and return the raw JSON body
    #[instrument(skip(self, query), fields(endpoint = Q::ENDPOINT.path()))]
    pub fn send<Q: BusQuery>(&self, query: &Q) -> Result<Value, TrackerError> {
        let request = self.api.request(query)?;
        self.transport.get(&request)
    }

    /// `gettime`
    pub fn get_time(&self, unix_time: bool) -> Result<Value, TrackerError> {
        self.send(&TimeRequest { unix_time })
    }

    /// `getrtpidatafeeds`
    pub fn get_rtpi_data_feeds(&self) -> Result<Value, TrackerError> {
        self.send(&RtpiDataFeedsRequest)
    }

    /// `getvehicles`
    pub fn get_vehicles(&self, request: &VehiclesRequest) -> Result<Value, TrackerError> {
        self.send(request)
    }

    /// `getroutes`
    pub fn get_routes(&self) -> Result<Value, TrackerError> {
        self.send(&RoutesRequest)
    }

    /// `getdirections`
    pub fn get_directions(&self, request: &DirectionsRequest) -> Result<Value, TrackerError> {
        self.send(request)
    }

    /// `getstops`
    pub fn get_stops(&self, request: &StopsRequest) -> Result<Value, TrackerError> {
        self.send(request)
    }

    /// `getpatterns`
    pub fn get_patterns(&self, request: &PatternsRequest) -> Result<Value, TrackerError> {
        self.send(request)
    }

    /// `getpredictions`
    pub fn get_predictions(&self, request: &PredictionsRequest) -> Result<Value, TrackerError> {
        self.send(request)
    }

    /// `getservicebulletins`
    pub fn get_service_bulletins(
        &self,
        request: &ServiceBulletinsRequest,
    ) -> Result<Value, TrackerError> {
        self.send(request)
    }

    /// `getlocalelist`
    pub fn get_locale_list(&self, in_locale_language: bool) -> Result<Value, TrackerError> {
        self.send(&LocaleListRequest { in_locale_language })
    }

    /// `getdetours`
    pub fn get_detours(&self, request: &DetoursRequest) -> Result<Value, TrackerError> {
        self.send(request)
    }

    /// `getagencies`
    pub fn get_agencies(&self) -> Result<Value, TrackerError> {
        self.send(&AgenciesRequest)
    }
}
