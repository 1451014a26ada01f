use colored::*;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::{optimize, OptimizeRequest, OptimizeResponse};
use crate::config::Settings;
use crate::database::sqlx::{db_connection, save_assignment};
use crate::error::{Result, RouteError};
use crate::export::write_waypoints_csv;
use crate::fixtures::data_generator::fixture_request;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::CLOSE))
        .init();
}

async fn load_request(settings: &Settings) -> Result<OptimizeRequest> {
    match &settings.request_path {
        Some(path) => {
            info!("Reading optimize request from {}", path);
            let body = tokio::fs::read_to_string(path).await?;
            OptimizeRequest::from_json(&body)
        }
        None => {
            warn!("ROUTE_REQUEST_PATH not set, solving a generated fixture instance");
            Ok(fixture_request(
                settings.fixture_count,
                settings.fixture_vehicles,
            ))
        }
    }
}

/// Entry point of the `route-solver` binary.
pub async fn run() -> Result<()> {
    init_tracing();
    let settings = Settings::from_env()?;

    let request = load_request(&settings).await?;

    // the solve is CPU bound, keep it off the async workers
    let response = tokio::task::spawn_blocking(move || optimize(&request))
        .await
        .map_err(|e| RouteError::internal(format!("solver task failed: {e}")))??;

    print_response(&response);
    write_waypoints_csv(&settings.output_csv, &response)?;

    if let Some(agent) = &settings.agent {
        let pool = db_connection(&settings.database_url).await?;
        let id = save_assignment(&pool, agent, &response).await?;
        println!("{}", format!("Saved assignment #{id} for {agent}").green());
    }

    Ok(())
}

fn print_response(response: &OptimizeResponse) {
    println!(
        "{}",
        format!(
            "{} vehicle(s), total cost {:.2} km, reported distance {:.2} km ({} seeds)",
            response.num_vehicles, response.total_cost, response.total_distance, response.iterations
        )
        .bold()
    );

    for (i, route) in response.routes.iter().enumerate() {
        let stops = route.waypoints.iter().filter(|w| !w.is_depot).count();
        println!(
            "{}",
            format!(
                "Route {}: {} stops, cost {:.2} km, distance {:.2} km",
                i + 1,
                stops,
                route.cost,
                route.distance
            )
            .green()
        );
        for wp in &route.waypoints {
            let label = format!(
                "  {:>3}. {} {}",
                wp.waypoint_index,
                wp.id,
                wp.address.as_deref().unwrap_or("")
            );
            if wp.is_depot {
                println!("{}", label.yellow());
            } else {
                println!("{}", label);
            }
        }
    }
}
