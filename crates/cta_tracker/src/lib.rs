//! Client for the Chicago Transit Authority Bus Tracker and Train Tracker APIs
//!
//! One method per remote endpoint. Parameters are forwarded as query
//! arguments under their upstream names (`stpid`, `rt`, `vid`, `mapid`, ...)
//! and every call is a single stateless HTTP round trip.
//!
//! # Architecture
//!
//! Each endpoint has a request type ([`bus::PredictionsRequest`],
//! [`train::ArrivalsRequest`], ...) that checks its parameters before
//! anything is sent. Trackers turn a request into an [`ApiRequest`] and pass
//! it to a transport:
//!
//! - [`Transport`] (async, [`HttpTransport`]) backs [`BusTracker`] and
//!   [`TrainTracker`]
//! - [`BlockingTransport`] ([`BlockingHttpTransport`]) backs
//!   [`BlockingBusTracker`] and [`BlockingTrainTracker`]
//!
//! Untyped trackers return the decoded JSON body unchanged. The typed
//! trackers ([`TypedBusTracker`], [`TypedTrainTracker`] and their blocking
//! counterparts) deserialize the response envelope into a record, validate
//! it, and return errors reported by the CTA as data.
//!
//! # Example
//!
//! ```rust,ignore
//! use cta_tracker::{TrackerConfig, TypedBusTracker};
//! use cta_tracker::bus::PredictionsRequest;
//!
//! let config = TrackerConfig::load()?;
//! let tracker = TypedBusTracker::new(&config)?;
//!
//! let response = tracker
//!     .get_predictions(&PredictionsRequest::for_stops("1001").with_top(5))
//!     .await?;
//! if let Some(predictions) = response.success() {
//!     for prd in &predictions.prd {
//!         println!("{} to {}: {} min", prd.rt, prd.des, prd.prdctdn);
//!     }
//! }
//! ```

pub mod bus;
mod config;
mod error;
mod nullable;
mod params;
pub mod train;
mod transport;
mod validation;

pub use bus::{BlockingBusTracker, BlockingTypedBusTracker, BusResponse, BusTracker, TypedBusTracker};
pub use config::{DEFAULT_BUS_BASE_URL, DEFAULT_TRAIN_BASE_URL, TrackerConfig};
pub use error::TrackerError;
pub use params::{IdList, MAX_IDS, QueryParams, TimeResolution};
pub use train::{
    BlockingTrainTracker, BlockingTypedTrainTracker, TrainResponse, TrainTracker,
    TypedTrainTracker,
};
pub use transport::{ApiRequest, BlockingHttpTransport, BlockingTransport, HttpTransport, Transport};
pub use validation::parse_timestamp;
