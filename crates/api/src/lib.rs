//! GraphQL gateway over the launch catalog and the user store.
//!
//! Serves the schema on `/graphql` with structured logging (tracing) and
//! Prometheus metrics. Each request is authenticated and given its own data
//! sources before the schema runs.

pub mod config;
pub mod error;
pub mod routes;
pub mod schema;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::{Backends, Gateway};
use launch_catalog::HttpLaunchCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use user_store::{InMemoryUserStore, PostgresUserStore};

use config::Config;
use error::BootstrapError;
use routes::graphql::AppState;

/// Creates the Axum application router over the given backends.
pub fn create_app(backends: Backends, metrics_handle: PrometheusHandle) -> Router {
    let state = AppState {
        schema: schema::build_schema(),
        gateway: Gateway::new(backends),
    };

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/graphql",
            get(routes::graphql::graphiql).post(routes::graphql::execute),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Connects the long-lived backends described by `config`.
///
/// Users live in PostgreSQL when `DATABASE_URL` is set (migrations are
/// applied here) and in memory otherwise.
///
/// # Errors
///
/// Fails when the database cannot be reached or migrated, or the catalog
/// URL is invalid.
pub async fn build_backends(config: &Config) -> Result<Backends, BootstrapError> {
    let catalog = HttpLaunchCatalog::from_base_url(&config.catalog_url, config.catalog_timeout)?;
    tracing::info!(url = %catalog.base_url(), "using launch catalog");

    let backends = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await?;
            let store = PostgresUserStore::new(pool);
            store.run_migrations().await?;
            tracing::info!("using postgres user store");
            Backends::new(Arc::new(catalog), Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, users are kept in memory");
            Backends::new(Arc::new(catalog), Arc::new(InMemoryUserStore::new()))
        }
    };
    Ok(backends)
}
