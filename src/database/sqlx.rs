use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tracing::{debug, info};

use crate::api::types::OptimizeResponse;
use crate::error::Result;

/// One stored stop of a saved route assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredStop {
    pub route_index: i64,
    pub position: i64,
    pub property_id: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub is_depot: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredAssignment {
    pub id: i64,
    pub agent: String,
    pub created_at: i64,
    pub num_vehicles: i64,
    pub total_cost: f64,
    pub total_distance: f64,
    pub stops: Vec<StoredStop>,
}

pub async fn db_connection(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;
    info!("Connected to SQLite database at {database_url}");

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS route_assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            agent TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            num_vehicles INTEGER NOT NULL,
            total_cost REAL NOT NULL,
            total_distance REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS route_stops (
            assignment_id INTEGER NOT NULL REFERENCES route_assignments(id),
            route_index INTEGER NOT NULL,
            position INTEGER NOT NULL,
            property_id TEXT NOT NULL,
            address TEXT,
            lat REAL NOT NULL,
            lon REAL NOT NULL,
            is_depot INTEGER NOT NULL,
            PRIMARY KEY (assignment_id, route_index, position)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Store an optimized result as the ordered stop list for `agent`.
pub async fn save_assignment(
    pool: &SqlitePool,
    agent: &str,
    response: &OptimizeResponse,
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let assignment_id = sqlx::query(
        r#"
        INSERT INTO route_assignments (agent, created_at, num_vehicles, total_cost, total_distance)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(agent)
    .bind(Utc::now().timestamp())
    .bind(response.num_vehicles as i64)
    .bind(response.total_cost)
    .bind(response.total_distance)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for (route_index, route) in response.routes.iter().enumerate() {
        for wp in &route.waypoints {
            sqlx::query(
                r#"
                INSERT INTO route_stops
                    (assignment_id, route_index, position, property_id, address, lat, lon, is_depot)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(assignment_id)
            .bind(route_index as i64)
            .bind(wp.waypoint_index as i64)
            .bind(wp.id.as_str())
            .bind(wp.address.as_deref())
            .bind(wp.lat)
            .bind(wp.lon)
            .bind(wp.is_depot)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    info!("Saved route assignment {} for {}", assignment_id, agent);
    Ok(assignment_id)
}

pub async fn load_assignment(pool: &SqlitePool, id: i64) -> Result<Option<StoredAssignment>> {
    let header = sqlx::query(
        "SELECT id, agent, created_at, num_vehicles, total_cost, total_distance FROM route_assignments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = header else {
        debug!("No route assignment with id {}", id);
        return Ok(None);
    };

    let stops = sqlx::query(
        r#"
        SELECT route_index, position, property_id, address, lat, lon, is_depot
        FROM route_stops
        WHERE assignment_id = ?
        ORDER BY route_index, position
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|r| StoredStop {
        route_index: r.get("route_index"),
        position: r.get("position"),
        property_id: r.get("property_id"),
        address: r.get("address"),
        lat: r.get("lat"),
        lon: r.get("lon"),
        is_depot: r.get("is_depot"),
    })
    .collect();

    Ok(Some(StoredAssignment {
        id: row.get("id"),
        agent: row.get("agent"),
        created_at: row.get("created_at"),
        num_vehicles: row.get("num_vehicles"),
        total_cost: row.get("total_cost"),
        total_distance: row.get("total_distance"),
        stops,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{DepotOutput, RouteOutput, Waypoint};
    use serde_json::Map;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        // a single connection keeps the in-memory database alive and shared
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate(&pool).await.unwrap();
        pool
    }

    fn response() -> OptimizeResponse {
        let wp = |id: &str, idx: usize| Waypoint {
            lat: 29.0 + idx as f64,
            lon: -95.0,
            id: id.into(),
            address: Some(format!("{id} Ave")),
            is_depot: idx == 0,
            waypoint_index: idx,
            extra: Map::new(),
        };
        OptimizeResponse {
            success: true,
            num_vehicles: 2,
            total_cost: 12.5,
            total_distance: 9.0,
            iterations: 4,
            routes: vec![
                RouteOutput {
                    waypoints: vec![wp("depot", 0), wp("a", 1), wp("b", 2)],
                    cost: 8.0,
                    distance: 6.0,
                },
                RouteOutput {
                    waypoints: vec![wp("depot", 0), wp("c", 1)],
                    cost: 4.5,
                    distance: 3.0,
                },
            ],
            depot: DepotOutput {
                lat: 29.0,
                lon: -95.0,
                address: None,
            },
        }
    }

    #[tokio::test]
    async fn saves_and_loads_ordered_stops() {
        let pool = memory_pool().await;
        let id = save_assignment(&pool, "agent-1", &response()).await.unwrap();

        let stored = load_assignment(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.agent, "agent-1");
        assert_eq!(stored.num_vehicles, 2);
        assert_eq!(stored.stops.len(), 5);

        let ids: Vec<&str> = stored.stops.iter().map(|s| s.property_id.as_str()).collect();
        assert_eq!(ids, vec!["depot", "a", "b", "depot", "c"]);
        assert!(stored.stops[0].is_depot);
        assert_eq!(stored.stops[4].route_index, 1);
    }

    #[tokio::test]
    async fn missing_assignment_is_none() {
        let pool = memory_pool().await;
        assert!(load_assignment(&pool, 99).await.unwrap().is_none());
    }
}
