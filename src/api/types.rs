use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};

fn default_vehicles() -> i64 {
    1
}

/// Body of an optimize call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default)]
    pub properties: Vec<PropertyInput>,
    #[serde(default = "default_vehicles")]
    pub num_vehicles: i64,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub depot_lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub depot_lon: Option<f64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub depot_property_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub second_depot_property_id: Option<String>,
}

impl OptimizeRequest {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| ValidationError::MalformedRequest(e.to_string()).into())
    }
}

/// One property as supplied by the data layer.
///
/// Coordinates that are missing, null, non-numeric or non-finite come through
/// as `None`; such properties are dropped before solving.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    /// Secondary lookup key, e.g. the county account number.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opt_string_or_number"
    )]
    pub property_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PropertyInput {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    pub fn matches_key(&self, key: &str) -> bool {
        self.id == key || self.property_id.as_deref() == Some(key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub success: bool,
    pub num_vehicles: usize,
    pub total_cost: f64,
    pub total_distance: f64,
    /// Number of construction seeds tried.
    pub iterations: usize,
    pub routes: Vec<RouteOutput>,
    pub depot: DepotOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOutput {
    pub waypoints: Vec<Waypoint>,
    /// Closed-tour cost including the return to the depot.
    pub cost: f64,
    /// Length of the listed waypoint path; the return leg is not included.
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    pub id: String,
    pub address: Option<String>,
    pub is_depot: bool,
    pub waypoint_index: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotOutput {
    pub lat: f64,
    pub lon: f64,
    pub address: Option<String>,
}

fn lenient_coordinate<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number identifier, got {other}"
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!(
            "expected a string or number identifier, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_request() {
        let req = OptimizeRequest::from_json(
            r#"{
                "properties": [
                    {"id": 7, "latitude": 29.7, "longitude": "-95.3", "address": "1 Main St", "ownerName": "DOE"},
                    {"id": "b", "latitude": null, "longitude": -95.0}
                ],
                "numVehicles": 2,
                "depotPropertyId": 7
            }"#,
        )
        .unwrap();

        assert_eq!(req.num_vehicles, 2);
        assert_eq!(req.depot_property_id.as_deref(), Some("7"));
        assert_eq!(req.properties[0].id, "7");
        assert_eq!(req.properties[0].coordinates(), Some((29.7, -95.3)));
        assert_eq!(req.properties[0].extra["ownerName"], "DOE");
        assert_eq!(req.properties[1].coordinates(), None);
    }

    #[test]
    fn non_numeric_coordinates_become_none() {
        let req = OptimizeRequest::from_json(
            r#"{"properties": [
                {"id": "x", "latitude": "abc", "longitude": 1.0},
                {"id": "y", "latitude": "NaN", "longitude": 1.0},
                {"id": "z", "latitude": true, "longitude": 1.0},
                {"id": "w", "longitude": 1.0}
            ]}"#,
        )
        .unwrap();

        assert_eq!(req.num_vehicles, 1);
        assert!(req.properties.iter().all(|p| p.coordinates().is_none()));
    }

    #[test]
    fn secondary_key_matches() {
        let p = PropertyInput {
            id: "12".into(),
            property_id: Some("ACC-1".into()),
            ..Default::default()
        };
        assert!(p.matches_key("12"));
        assert!(p.matches_key("ACC-1"));
        assert!(!p.matches_key("13"));
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let err = OptimizeRequest::from_json(r#"{"properties": "#).unwrap_err();
        assert!(err.is_validation());

        let err = OptimizeRequest::from_json(r#"{"properties": [], "numVehicles": 1.5}"#).unwrap_err();
        assert!(err.is_validation());
    }
}
