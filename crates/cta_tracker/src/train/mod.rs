//! CTA Train Tracker (API v1.0)
//!
//! Same layout as [`crate::bus`]: untyped trackers return the raw JSON,
//! typed trackers return [`TrainResponse`].

mod client;
pub mod models;
mod requests;
mod typed;

pub use client::{BlockingTrainTracker, TrainTracker};
pub use models::*;
pub use requests::{ArrivalsRequest, FollowRequest, PositionsRequest, TrainEndpoint, TrainQuery};
pub use typed::{
    BlockingTypedTrainTracker, TRAIN_ENVELOPE, TrainResponse, TypedTrainTracker,
    parse_train_response,
};
