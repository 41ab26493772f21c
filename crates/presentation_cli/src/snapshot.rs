//! Route snapshots: every vehicle on a route plus its upcoming stops

use chrono::{DateTime, Utc};
use cta_tracker::bus::{BUS_ENVELOPE, PredictionsRequest, VehiclesRequest};
use cta_tracker::{BusTracker, MAX_IDS, TrackerError, Transport};
use futures::future::try_join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// One capture of a route
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// `getvehicles` body as returned
    pub vehicle_response: Value,
    /// One `getpredictions` body per batch of vehicles
    pub predictions: Vec<Value>,
    pub timestamp: DateTime<Utc>,
}

/// Vehicle ids listed in a `getvehicles` body
///
/// Bodies holding an upstream error carry no vehicles.
pub fn vehicle_ids(document: &Value) -> Vec<String> {
    document
        .get(BUS_ENVELOPE)
        .and_then(|body| body.get("vehicle"))
        .and_then(Value::as_array)
        .map(|vehicles| {
            vehicles
                .iter()
                .filter_map(|vehicle| vehicle.get("vid").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Capture the vehicles on `route` and request their predictions
///
/// Vehicles are batched by the per-request id limit and the batches are
/// requested concurrently.
#[instrument(skip(tracker))]
pub async fn capture<T: Transport>(
    tracker: &BusTracker<T>,
    route: &str,
) -> Result<Snapshot, TrackerError> {
    let vehicle_response = tracker
        .get_vehicles(&VehiclesRequest::by_route(route))
        .await?;
    let vids = vehicle_ids(&vehicle_response);
    debug!(vehicles = vids.len(), "Requesting predictions");

    let predictions = try_join_all(vids.chunks(MAX_IDS).map(|batch| {
        let request = PredictionsRequest::for_vehicles(batch.to_vec());
        async move { tracker.get_predictions(&request).await }
    }))
    .await?;

    Ok(Snapshot {
        vehicle_response,
        predictions,
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use cta_tracker::{ApiRequest, TrackerConfig};
    use serde_json::json;

    use super::*;

    #[derive(Clone, Default)]
    struct RouteFixture {
        vehicles: usize,
        requests: Arc<Mutex<Vec<ApiRequest>>>,
    }

    #[async_trait]
    impl Transport for RouteFixture {
        async fn get(&self, request: &ApiRequest) -> Result<Value, TrackerError> {
            self.requests.lock().unwrap().push(request.clone());
            match request.endpoint() {
                "getvehicles" => {
                    let vehicles: Vec<Value> = (0..self.vehicles)
                        .map(|i| json!({"vid": format!("{}", 8000 + i), "rt": "20"}))
                        .collect();
                    Ok(json!({"bustime-response": {"vehicle": vehicles}}))
                },
                "getpredictions" => Ok(json!({"bustime-response": {"prd": []}})),
                other => Err(TrackerError::InvalidArgument(format!(
                    "unexpected endpoint {other}"
                ))),
            }
        }
    }

    fn tracker(fixture: &RouteFixture) -> BusTracker<RouteFixture> {
        BusTracker::with_transport(&TrackerConfig::for_testing(), fixture.clone()).unwrap()
    }

    #[test]
    fn vehicle_ids_from_body() {
        let body = json!({"bustime-response": {"vehicle": [{"vid": "1"}, {"vid": "2"}]}});
        assert_eq!(vehicle_ids(&body), vec!["1", "2"]);

        let error = json!({"bustime-response": {"error": [{"msg": "No data found for parameter"}]}});
        assert!(vehicle_ids(&error).is_empty());
    }

    #[tokio::test]
    async fn batches_predictions_by_id_limit() {
        let fixture = RouteFixture {
            vehicles: 23,
            ..RouteFixture::default()
        };

        let snapshot = capture(&tracker(&fixture), "20").await.unwrap();
        assert_eq!(snapshot.predictions.len(), 3);

        let requests = fixture.requests.lock().unwrap().clone();
        assert_eq!(requests[0].query().get("rt"), Some("20"));

        let mut batches: Vec<usize> = requests[1..]
            .iter()
            .map(|r| r.query().get("vid").unwrap().split(',').count())
            .collect();
        batches.sort_unstable();
        assert_eq!(batches, vec![3, 10, 10]);
    }

    #[tokio::test]
    async fn empty_route_skips_predictions() {
        let fixture = RouteFixture::default();

        let snapshot = capture(&tracker(&fixture), "20").await.unwrap();
        assert!(snapshot.predictions.is_empty());
        assert_eq!(fixture.requests.lock().unwrap().len(), 1);

        let document = serde_json::to_value(&snapshot).unwrap();
        assert!(document["timestamp"].is_string());
    }
}
