use std::time::{Duration, Instant};

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::server::app::AppState;

const DB_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: DatabaseHealth,
    connection_pool: PoolHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DatabaseHealth {
    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Serialize)]
pub struct PoolHealth {
    size: u32,
    idle: usize,
    max: u32,
}

/// Liveness probe. Runs a trivial query against Postgres and reports pool
/// utilization alongside it. 200 when the database answers, 503 otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = probe_database(&state.db_pool).await;

    let connection_pool = PoolHealth {
        size: state.db_pool.size(),
        idle: state.db_pool.num_idle(),
        max: state.db_pool.options().get_max_connections(),
    };

    let (status, code) = if database.is_ok() {
        ("healthy", StatusCode::OK)
    } else {
        ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            connection_pool,
        }),
    )
}

async fn probe_database(pool: &PgPool) -> DatabaseHealth {
    let started = Instant::now();

    match tokio::time::timeout(DB_PROBE_TIMEOUT, sqlx::query("SELECT 1").execute(pool)).await {
        Ok(Ok(_)) => DatabaseHealth {
            status: "ok",
            latency_ms: Some(started.elapsed().as_millis()),
            error: None,
        },
        Ok(Err(e)) => DatabaseHealth {
            status: "error",
            latency_ms: None,
            error: Some(format!("query failed: {}", e)),
        },
        Err(_) => DatabaseHealth {
            status: "error",
            latency_ms: None,
            error: Some(format!("query timed out after {:?}", DB_PROBE_TIMEOUT)),
        },
    }
}
