//! Lenient field decoding
//!
//! A field whose JSON value has the wrong shape decodes as `None` instead of
//! failing the enclosing payload. Use together with `#[serde(default)]`:
//!
//! ```
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Tempo {
//!     #[serde(default, deserialize_with = "mla_common::models::lenient::deserialize")]
//!     average_bpm: Option<f64>,
//! }
//!
//! let tempo: Tempo = serde_json::from_str(r#"{"average_bpm": "fast"}"#).unwrap();
//! assert_eq!(tempo.average_bpm, None);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Decode an optional field, discarding values that do not fit `T`
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value(v) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::debug!(error = %e, "Discarding malformed field");
            None
        }
    }))
}

/// Decode a sequence, keeping only the elements that fit `T`
pub fn deserialize_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        Some(_) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::deserialize")]
        count: Option<f64>,
        #[serde(default, deserialize_with = "super::deserialize_seq")]
        names: Option<Vec<String>>,
    }

    #[test]
    fn test_well_formed_values_decode() {
        let sample: Sample = serde_json::from_str(r#"{"count": 3, "names": ["C", "G"]}"#).unwrap();
        assert_eq!(sample.count, Some(3.0));
        assert_eq!(sample.names, Some(vec!["C".to_string(), "G".to_string()]));
    }

    #[test]
    fn test_missing_and_null_values_are_none() {
        let sample: Sample = serde_json::from_str(r#"{"count": null}"#).unwrap();
        assert_eq!(sample.count, None);
        assert_eq!(sample.names, None);
    }

    #[test]
    fn test_wrong_shape_is_none() {
        let sample: Sample = serde_json::from_str(r#"{"count": "many", "names": "C"}"#).unwrap();
        assert_eq!(sample.count, None);
        assert_eq!(sample.names, None);
    }

    #[test]
    fn test_sequence_drops_malformed_elements() {
        let sample: Sample = serde_json::from_str(r#"{"names": ["C", 4, null, "E"]}"#).unwrap();
        assert_eq!(sample.names, Some(vec!["C".to_string(), "E".to_string()]));
    }
}
