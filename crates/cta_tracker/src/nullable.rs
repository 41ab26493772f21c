//! Optional response fields that keep `null` apart from a missing key
//!
//! Such fields are declared as `Option<Option<T>>` with
//! `#[serde(default, deserialize_with = "nullable::present", skip_serializing_if = "Option::is_none")]`:
//!
//! - `None`: the key was absent and is not written back
//! - `Some(None)`: the key was `null` and is written back as `null`
//! - `Some(Some(value))`: the key held a value

use serde::{Deserialize, Deserializer};

/// Deserialize a key that is present, `null` included
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::{Value, json};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        #[serde(
            default,
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )]
        zone: Option<Option<String>>,
    }

    fn round_trip(value: &Value) -> (Record, Value) {
        let record: Record = serde_json::from_value(value.clone()).unwrap();
        let back = serde_json::to_value(&record).unwrap();
        (record, back)
    }

    #[test]
    fn test_missing_key_stays_missing() {
        let (record, back) = round_trip(&json!({}));
        assert_eq!(record.zone, None);
        assert_eq!(back, json!({}));
    }

    #[test]
    fn test_null_stays_null() {
        let (record, back) = round_trip(&json!({"zone": null}));
        assert_eq!(record.zone, Some(None));
        assert_eq!(back, json!({"zone": null}));
    }

    #[test]
    fn test_value_kept() {
        let (record, back) = round_trip(&json!({"zone": "A"}));
        assert_eq!(record.zone, Some(Some("A".to_string())));
        assert_eq!(back, json!({"zone": "A"}));
    }
}
