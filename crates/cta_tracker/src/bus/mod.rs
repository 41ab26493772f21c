//! CTA Bus Tracker (API v3)
//!
//! - [`BusTracker`] / [`BlockingBusTracker`] return the raw JSON body
//! - [`TypedBusTracker`] / [`BlockingTypedBusTracker`] return validated
//!   records wrapped in [`BusResponse`]
//!
//! Every endpoint has a request type implementing [`BusQuery`]; the
//! `get_*` methods are shorthands for sending one.

mod client;
pub mod models;
mod requests;
mod typed;

pub use client::{BlockingBusTracker, BusTracker};
pub use models::*;
pub use requests::{
    AgenciesRequest, BusEndpoint, BusQuery, DetoursRequest, DirectionsRequest, LocaleListRequest,
    PatternsRequest, PredictionsRequest, RoutesRequest, RtpiDataFeedsRequest,
    ServiceBulletinsRequest, StopsRequest, TimeRequest, VehiclesRequest,
};
pub use typed::{
    BUS_ENVELOPE, BlockingTypedBusTracker, BusResponse, TypedBusTracker, parse_bus_response,
};
