//! Blocking and async trackers must agree on identical inputs

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use cta_tracker::bus::PredictionsRequest;
use cta_tracker::{
    ApiRequest, BlockingBusTracker, BlockingTransport, BlockingTypedBusTracker, BusTracker,
    TrackerConfig, TrackerError, Transport, TypedBusTracker,
};

/// Answers every request with the same document and records what it was asked
#[derive(Clone)]
struct FixtureTransport {
    body: Value,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl FixtureTransport {
    fn new(body: Value) -> Self {
        Self {
            body,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, request: &ApiRequest) -> Value {
        self.requests.lock().unwrap().push(request.clone());
        self.body.clone()
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn get(&self, request: &ApiRequest) -> Result<Value, TrackerError> {
        Ok(self.record(request))
    }
}

impl BlockingTransport for FixtureTransport {
    fn get(&self, request: &ApiRequest) -> Result<Value, TrackerError> {
        Ok(self.record(request))
    }
}

fn predictions_fixture() -> Value {
    json!({"bustime-response": {"prd": [
        {
            "tmstmp": "20250717 22:47",
            "typ": "A",
            "stpnm": "Madison & Wells",
            "stpid": "1001",
            "vid": "8012",
            "dstp": 4230,
            "rt": "20",
            "rtdd": "20",
            "rtdir": "Eastbound",
            "des": "Michigan",
            "prdtm": "20250717 22:53",
            "tablockid": "20 -703",
            "tatripid": "1012862",
            "origtatripno": "259218725",
            "dly": false,
            "dyn": 0,
            "prdctdn": "6",
            "zone": "",
            "psgld": "HALF_EMPTY",
            "stst": 81900,
            "stsd": "2025-07-17",
            "flagstop": 0
        },
        {
            "tmstmp": "20250717 22:47",
            "typ": "A",
            "stpnm": "Madison & Wells",
            "stpid": "1001",
            "vid": "8140",
            "dstp": 310,
            "rt": "20",
            "rtdd": "20",
            "rtdir": "Eastbound",
            "des": "Michigan",
            "prdtm": "20250717 22:48",
            "tablockid": "20 -712",
            "tatripid": "1012870",
            "origtatripno": "259218733",
            "dly": false,
            "dyn": 0,
            "prdctdn": "DUE",
            "zone": "",
            "psgld": "",
            "stst": 81300,
            "stsd": "2025-07-17",
            "flagstop": 0
        }
    ]}})
}

#[tokio::test]
async fn test_untyped_predictions_identical() {
    let config = TrackerConfig::for_testing();
    let fixture = FixtureTransport::new(predictions_fixture());
    let request = PredictionsRequest::for_stops("1001");

    let async_body = BusTracker::with_transport(&config, fixture.clone())
        .unwrap()
        .get_predictions(&request)
        .await
        .unwrap();
    let blocking_body = BlockingBusTracker::with_transport(&config, fixture.clone())
        .unwrap()
        .get_predictions(&request)
        .unwrap();

    assert_eq!(async_body, blocking_body);
    assert_eq!(async_body, predictions_fixture());

    let requests = fixture.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
    assert_eq!(requests[0].query().get("stpid"), Some("1001"));
}

#[tokio::test]
async fn test_typed_predictions_identical() {
    let config = TrackerConfig::for_testing();
    let fixture = FixtureTransport::new(predictions_fixture());
    let request = PredictionsRequest::for_stops("1001");

    let async_response = TypedBusTracker::with_transport(&config, fixture.clone())
        .unwrap()
        .get_predictions(&request)
        .await
        .unwrap();
    let blocking_response = BlockingTypedBusTracker::with_transport(&config, fixture.clone())
        .unwrap()
        .get_predictions(&request)
        .unwrap();

    assert_eq!(async_response, blocking_response);

    let predictions = async_response.success().unwrap();
    assert_eq!(predictions.prd[1].minutes_away(), Some(0));
    assert_eq!(async_response.to_document().unwrap(), predictions_fixture());
}

#[tokio::test]
async fn test_parameter_errors_identical() {
    let config = TrackerConfig::for_testing();
    let fixture = FixtureTransport::new(predictions_fixture());
    let request = PredictionsRequest {
        stpid: Some("1001".into()),
        vid: Some("8012".into()),
        ..PredictionsRequest::default()
    };

    let async_err = BusTracker::with_transport(&config, fixture.clone())
        .unwrap()
        .get_predictions(&request)
        .await
        .unwrap_err();
    let blocking_err = BlockingBusTracker::with_transport(&config, fixture.clone())
        .unwrap()
        .get_predictions(&request)
        .unwrap_err();

    assert_eq!(async_err.to_string(), blocking_err.to_string());
    assert!(fixture.requests().is_empty());
}
