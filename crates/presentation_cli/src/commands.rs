//! Bus and train subcommands

use clap::Subcommand;
use cta_tracker::bus::{
    AgenciesRequest, BusQuery, DetoursRequest, DirectionsRequest, LocaleListRequest,
    PatternsRequest, PredictionsRequest, RoutesRequest, RtpiDataFeedsRequest,
    ServiceBulletinsRequest, StopsRequest, TimeRequest, VehiclesRequest,
};
use cta_tracker::train::{ArrivalsRequest, FollowRequest, PositionsRequest, TrainQuery};
use cta_tracker::{
    BusTracker, IdList, TimeResolution, TrackerConfig, TrainTracker, TypedBusTracker,
    TypedTrainTracker,
};
use serde_json::Value;

/// Bus Tracker endpoints. Identifier lists are comma-delimited.
#[derive(Debug, Subcommand)]
pub enum BusCommand {
    /// Server time (`gettime`)
    Time {
        /// Return milliseconds since the epoch
        #[arg(long)]
        unix_time: bool,
    },

    /// Real-time passenger information feeds (`getrtpidatafeeds`)
    Feeds,

    /// Vehicle locations (`getvehicles`)
    Vehicles {
        #[arg(long)]
        vid: Option<String>,
        #[arg(long)]
        rt: Option<String>,
        #[arg(long, default_value = "s")]
        tmres: TimeResolution,
    },

    /// All routes (`getroutes`)
    Routes,

    /// Directions of one route (`getdirections`)
    Directions {
        #[arg(long)]
        rt: String,
    },

    /// Stops on a route direction, or specific stops (`getstops`)
    Stops {
        #[arg(long)]
        rt: Option<String>,
        #[arg(long)]
        dir: Option<String>,
        #[arg(long)]
        stpid: Option<String>,
    },

    /// Route geometry (`getpatterns`)
    Patterns {
        #[arg(long)]
        pid: Option<String>,
        #[arg(long)]
        rt: Option<String>,
    },

    /// Arrival and departure predictions (`getpredictions`)
    Predictions {
        #[arg(long)]
        stpid: Option<String>,
        #[arg(long)]
        rt: Option<String>,
        #[arg(long)]
        vid: Option<String>,
        #[arg(long)]
        top: Option<u32>,
        #[arg(long, default_value = "s")]
        tmres: TimeResolution,
    },

    /// Service bulletins (`getservicebulletins`)
    Bulletins {
        #[arg(long)]
        rt: Option<String>,
        #[arg(long)]
        rtdir: Option<String>,
        #[arg(long)]
        stpid: Option<String>,
    },

    /// Supported languages (`getlocalelist`)
    Locales {
        /// Show names in their own language
        #[arg(long)]
        in_locale_language: bool,
    },

    /// Active detours (`getdetours`)
    Detours {
        #[arg(long)]
        rt: Option<String>,
        #[arg(long)]
        rtdir: Option<String>,
        #[arg(long)]
        rtpidatafeed: Option<String>,
    },

    /// Agencies served (`getagencies`)
    Agencies,
}

/// Train Tracker endpoints
#[derive(Debug, Subcommand)]
pub enum TrainCommand {
    /// Arrival predictions for a station or platform (`ttarrivals`)
    Arrivals {
        /// Parent station id (4xxxx)
        #[arg(long)]
        mapid: Option<String>,
        /// Platform stop id (3xxxx)
        #[arg(long)]
        stpid: Option<String>,
        #[arg(long)]
        max: Option<u32>,
        #[arg(long)]
        rt: Option<String>,
    },

    /// Upcoming stops of one train (`ttfollow`)
    Follow {
        /// Run number
        runnumber: String,
    },

    /// Train positions on the given routes (`ttpositions`)
    Positions {
        #[arg(long)]
        rt: String,
    },
}

fn ids(value: Option<String>) -> Option<IdList> {
    value.map(IdList::from)
}

async fn bus_query<Q: BusQuery>(
    config: &TrackerConfig,
    typed: bool,
    query: &Q,
) -> anyhow::Result<Value> {
    if typed {
        let response = TypedBusTracker::new(config)?.fetch(query).await?;
        Ok(serde_json::to_value(&response)?)
    } else {
        Ok(BusTracker::new(config)?.send(query).await?)
    }
}

async fn train_query<Q: TrainQuery>(
    config: &TrackerConfig,
    typed: bool,
    query: &Q,
) -> anyhow::Result<Value> {
    if typed {
        let response = TypedTrainTracker::new(config)?.fetch(query).await?;
        Ok(serde_json::to_value(&response)?)
    } else {
        Ok(TrainTracker::new(config)?.send(query).await?)
    }
}

/// Run one Bus Tracker subcommand and return the document to print
pub async fn run_bus(
    command: BusCommand,
    config: &TrackerConfig,
    typed: bool,
) -> anyhow::Result<Value> {
    match command {
        BusCommand::Time { unix_time } => {
            bus_query(config, typed, &TimeRequest { unix_time }).await
        },
        BusCommand::Feeds => bus_query(config, typed, &RtpiDataFeedsRequest).await,
        BusCommand::Vehicles { vid, rt, tmres } => {
            let request = VehiclesRequest {
                vid: ids(vid),
                rt: ids(rt),
                tmres,
            };
            bus_query(config, typed, &request).await
        },
        BusCommand::Routes => bus_query(config, typed, &RoutesRequest).await,
        BusCommand::Directions { rt } => {
            bus_query(config, typed, &DirectionsRequest::new(rt)).await
        },
        BusCommand::Stops { rt, dir, stpid } => {
            let request = StopsRequest {
                rt: ids(rt),
                dir,
                stpid: ids(stpid),
            };
            bus_query(config, typed, &request).await
        },
        BusCommand::Patterns { pid, rt } => {
            let request = PatternsRequest {
                pid: ids(pid),
                rt: ids(rt),
            };
            bus_query(config, typed, &request).await
        },
        BusCommand::Predictions {
            stpid,
            rt,
            vid,
            top,
            tmres,
        } => {
            let request = PredictionsRequest {
                stpid: ids(stpid),
                rt: ids(rt),
                vid: ids(vid),
                top,
                tmres,
            };
            bus_query(config, typed, &request).await
        },
        BusCommand::Bulletins { rt, rtdir, stpid } => {
            let request = ServiceBulletinsRequest {
                rt: ids(rt),
                rtdir,
                stpid: ids(stpid),
            };
            bus_query(config, typed, &request).await
        },
        BusCommand::Locales { in_locale_language } => {
            bus_query(config, typed, &LocaleListRequest { in_locale_language }).await
        },
        BusCommand::Detours {
            rt,
            rtdir,
            rtpidatafeed,
        } => {
            let request = DetoursRequest {
                rt: ids(rt),
                rtdir,
                rtpidatafeed,
            };
            bus_query(config, typed, &request).await
        },
        BusCommand::Agencies => bus_query(config, typed, &AgenciesRequest).await,
    }
}

/// Run one Train Tracker subcommand and return the document to print
pub async fn run_train(
    command: TrainCommand,
    config: &TrackerConfig,
    typed: bool,
) -> anyhow::Result<Value> {
    match command {
        TrainCommand::Arrivals {
            mapid,
            stpid,
            max,
            rt,
        } => {
            let request = ArrivalsRequest {
                mapid,
                stpid,
                max,
                rt,
            };
            train_query(config, typed, &request).await
        },
        TrainCommand::Follow { runnumber } => {
            train_query(config, typed, &FollowRequest::new(runnumber)).await
        },
        TrainCommand::Positions { rt } => {
            train_query(config, typed, &PositionsRequest::new(rt)).await
        },
    }
}
