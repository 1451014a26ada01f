use std::path::Path;

use csv::Writer;
use serde::Serialize;
use tracing::info;

use crate::api::types::OptimizeResponse;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct WaypointRow<'a> {
    route: usize,
    waypoint_index: usize,
    id: &'a str,
    address: &'a str,
    lat: f64,
    lon: f64,
    is_depot: bool,
}

/// Write every waypoint of every route as one CSV row.
pub fn write_waypoints_csv(path: impl AsRef<Path>, response: &OptimizeResponse) -> Result<usize> {
    let path = path.as_ref();
    let mut wtr = Writer::from_path(path)?;

    let mut rows = 0;
    for (route, output) in response.routes.iter().enumerate() {
        for wp in &output.waypoints {
            wtr.serialize(WaypointRow {
                route,
                waypoint_index: wp.waypoint_index,
                id: &wp.id,
                address: wp.address.as_deref().unwrap_or(""),
                lat: wp.lat,
                lon: wp.lon,
                is_depot: wp.is_depot,
            })?;
            rows += 1;
        }
    }

    wtr.flush()?;
    info!("Wrote {} waypoints to {}", rows, path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{DepotOutput, RouteOutput, Waypoint};
    use serde_json::Map;

    fn waypoint(id: &str, idx: usize, is_depot: bool) -> Waypoint {
        Waypoint {
            lat: 29.7,
            lon: -95.3,
            id: id.into(),
            address: Some(format!("{id} Rd")),
            is_depot,
            waypoint_index: idx,
            extra: Map::new(),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let response = OptimizeResponse {
            success: true,
            num_vehicles: 1,
            total_cost: 2.0,
            total_distance: 1.0,
            iterations: 2,
            routes: vec![RouteOutput {
                waypoints: vec![waypoint("d", 0, true), waypoint("a", 1, false)],
                cost: 2.0,
                distance: 1.0,
            }],
            depot: DepotOutput {
                lat: 29.7,
                lon: -95.3,
                address: None,
            },
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypoints.csv");
        assert_eq!(write_waypoints_csv(&path, &response).unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("route,waypoint_index,id,address,lat,lon,is_depot")
        );
        assert_eq!(lines.next(), Some("0,0,d,d Rd,29.7,-95.3,true"));
        assert_eq!(lines.next(), Some("0,1,a,a Rd,29.7,-95.3,false"));
    }
}
