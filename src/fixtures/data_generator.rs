use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Map};
use tracing::info;

use crate::api::types::{OptimizeRequest, PropertyInput};
use crate::config::constant::FIXTURE_SEED;

/// Harris County courthouse, used as the default fixture centre.
pub const DEFAULT_CENTER: (f64, f64) = (29.7604, -95.3698);

/// Generates `count` properties scattered uniformly within `spread` degrees
/// of `center`. The first property sits on the centre itself.
pub fn generate_properties(count: usize, center: (f64, f64), spread: f64, seed: u64) -> Vec<PropertyInput> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (lat0, lon0) = center;

    (0..count)
        .map(|i| {
            let (lat, lon) = if i == 0 {
                center
            } else {
                (
                    lat0 + rng.gen_range(-spread..=spread),
                    lon0 + rng.gen_range(-spread..=spread),
                )
            };

            let mut extra = Map::new();
            extra.insert("totalDue".into(), json!(rng.gen_range(500..=25_000)));
            extra.insert(
                "status".into(),
                json!(if i % 3 == 0 { "pre-foreclosure" } else { "delinquent" }),
            );

            PropertyInput {
                id: format!("P{:04}", i),
                latitude: Some(lat),
                longitude: Some(lon),
                address: Some(format!("{} Fixture St", 100 + i)),
                property_id: Some(format!("ACC-{:06}", 1000 + i)),
                extra,
            }
        })
        .collect()
}

/// Demo request with the first generated property as the depot.
pub fn fixture_request(count: usize, num_vehicles: i64) -> OptimizeRequest {
    let properties = generate_properties(count, DEFAULT_CENTER, 0.15, FIXTURE_SEED);
    info!(
        "Generated {} fixture properties for {} vehicle(s)",
        properties.len(),
        num_vehicles
    );

    OptimizeRequest {
        properties,
        num_vehicles,
        ..Default::default()
    }
}
