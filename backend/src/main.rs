//! Farm Grid Management - Backend Server
//!
//! Lets farm owners describe their farms, carve them into irrigation zones
//! within the farm's surface, and place trees on each zone's planting grid.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;
mod store;

pub use crate::config::Config;

use crate::config::StorageBackend;
use crate::error::AppError;
use crate::services::FarmLocks;
use crate::store::{PgStore, Stores};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub farm_locks: Arc<FarmLocks>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fgm_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Farm Grid Management Server");
    tracing::info!("Environment: {}", config.environment);

    let stores = open_stores(&config).await?;

    // Create application state
    let state = AppState {
        stores,
        farm_locks: Arc::new(FarmLocks::new()),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            AppError::Configuration(format!(
                "invalid server address {}:{}: {}",
                config.server.host, config.server.port, e
            ))
        })?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the store adapter selected by the configuration
async fn open_stores(config: &Config) -> anyhow::Result<Stores> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Stores::in_memory())
        }
        StorageBackend::Postgres => {
            // Create database connection pool
            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(&config.database.url)
                .await?;

            tracing::info!("Database connection established");

            // Run migrations in development
            if config.environment == "development" {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations").run(&db_pool).await?;
                tracing::info!("Migrations completed");
            }

            Ok(Stores::from_adapter(PgStore::new(db_pool)))
        }
    }
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Farm Grid Management API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = Config {
            environment: "test".to_string(),
            server: crate::config::ServerConfig::default(),
            database: crate::config::DatabaseConfig {
                url: String::new(),
                max_connections: 1,
                min_connections: 0,
            },
            storage: crate::config::StorageConfig {
                backend: StorageBackend::Memory,
            },
        };

        create_app(AppState {
            stores: Stores::in_memory(),
            farm_locks: Arc::new(FarmLocks::new()),
            config: Arc::new(config),
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_farm(app: &Router, length: u32, width: u32) -> String {
        let (status, farm) = send(
            app,
            Method::POST,
            "/api/v1/farms",
            Some(json!({
                "owner_id": uuid::Uuid::new_v4(),
                "name": "Ferme Test",
                "longueur": length,
                "largeur": width,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        farm["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_reports_store() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["storage"], "memory");
        assert_eq!(body["store"], "connected");
    }

    #[tokio::test]
    async fn test_zone_admission_over_http() {
        let app = test_app();
        let farm_id = create_farm(&app, 100, 60).await;
        let zones_uri = format!("/api/v1/farms/{}/zones", farm_id);

        let (status, _) = send(
            &app,
            Method::POST,
            &zones_uri,
            Some(json!({"name": "A", "width": 50, "length": 40})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            Method::POST,
            &zones_uri,
            Some(json!({"name": "B", "width": 60, "length": 70})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "CAPACITY_EXCEEDED");
        assert_eq!(body["error"]["message_fr"], crate::error::CAPACITY_EXCEEDED_FR);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("{}/admission", zones_uri),
            Some(json!({"width": 40, "length": 100})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["admitted"], true);

        let (status, zones) = send(&app, Method::GET, &zones_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(zones.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unstorable_dimensions_over_http() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/farms",
            Some(json!({
                "owner_id": uuid::Uuid::new_v4(),
                "name": "Immense",
                "longueur": "100000000000000000000",
                "largeur": "100000000000000000000",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "length");

        let farm_id = create_farm(&app, 100, 100).await;
        let zones_uri = format!("/api/v1/farms/{}/zones", farm_id);
        let (status, body) = send(
            &app,
            Method::POST,
            &zones_uri,
            Some(json!({"name": "A", "width": "1000000000000000", "length": "1000000000000000"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "width");

        let (status, body) = send(
            &app,
            Method::POST,
            &zones_uri,
            Some(json!({"name": "B", "width": "40.005", "length": "10"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "width");

        let (_, zones) = send(&app, Method::GET, &zones_uri, None).await;
        assert!(zones.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tree_placement_over_http() {
        let app = test_app();
        let farm_id = create_farm(&app, 100, 100).await;
        let (_, zone) = send(
            &app,
            Method::POST,
            &format!("/api/v1/farms/{}/zones", farm_id),
            Some(json!({"name": "Verger", "width": 22, "length": 30, "mode": "MANUAL"})),
        )
        .await;
        let zone_uri = format!("/api/v1/farms/{}/zones/{}", farm_id, zone["id"].as_str().unwrap());

        let (status, trees) = send(
            &app,
            Method::POST,
            &format!("{}/trees/bulk", zone_uri),
            Some(json!({"count": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(trees[9]["tree_code"], "T010");
        assert_eq!(trees[9]["row_number"], 2);

        let (status, tree) = send(
            &app,
            Method::POST,
            &format!("{}/trees", zone_uri),
            Some(json!({"tree_code": "X1", "row_number": 1, "index_in_row": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(tree["health_status"], "OK");

        let (status, batch) = send(
            &app,
            Method::POST,
            &format!("{}/trees", zone_uri),
            Some(json!([{"tree_code": "Y1"}, {"tree_code": "Y2", "health_status": "STRESS"}])),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(batch.as_array().unwrap().len(), 2);

        let (status, grid) = send(&app, Method::GET, &format!("{}/grid", zone_uri), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(grid["trees_per_row"], 4);
        assert_eq!(grid["rows"], 6);
        assert_eq!(grid["trees"].as_array().unwrap().len(), 13);
    }

    #[tokio::test]
    async fn test_narrow_zone_bulk_is_rejected() {
        let app = test_app();
        let farm_id = create_farm(&app, 50, 50).await;
        let (_, zone) = send(
            &app,
            Method::POST,
            &format!("/api/v1/farms/{}/zones", farm_id),
            Some(json!({"name": "Bande", "width": 3, "length": 30})),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!(
                "/api/v1/farms/{}/zones/{}/trees/bulk",
                farm_id,
                zone["id"].as_str().unwrap()
            ),
            Some(json!({"count": 4})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_ZONE_DIMENSIONS");
    }

    #[tokio::test]
    async fn test_cascade_delete_over_http() {
        let app = test_app();
        let farm_id = create_farm(&app, 50, 50).await;
        let zones_uri = format!("/api/v1/farms/{}/zones", farm_id);
        send(
            &app,
            Method::POST,
            &zones_uri,
            Some(json!({"name": "A", "width": 10, "length": 10})),
        )
        .await;

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/farms/{}?cascade=true", farm_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, &zones_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
