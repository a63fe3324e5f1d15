//! HTTP API Layer
//!
//! REST API for the settlement apportionment engine using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for health and settlements
//! - **Middleware**: Request IDs, tracing, request logging
//! - **DTOs**: camelCase request/response bodies
//! - **Store**: In-memory settlement repository
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig};
//!
//! let app = create_router(ApiConfig::default());
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod store;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_settlement::SettlementService;

use crate::config::ApiConfig;
use crate::handlers::{health, settlements};
use crate::middleware::{request_log_middleware, REQUEST_ID_HEADER};
use crate::store::InMemorySettlementRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: SettlementService,
    pub config: ApiConfig,
}

/// Creates the API router backed by an in-memory repository
pub fn create_router(config: ApiConfig) -> Router {
    let service = SettlementService::new(Arc::new(InMemorySettlementRepository::new()))
        .with_mode(config.validation_mode());
    create_router_with_service(service, config)
}

/// Creates the main API router around an existing service
///
/// # Arguments
///
/// * `service` - Settlement service, with its repository already wired
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router_with_service(service: SettlementService, config: ApiConfig) -> Router {
    let state = AppState { service, config };
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Public routes
    let public_routes = Router::new().route("/health", get(health::health_check));

    // Settlement routes
    let settlement_routes = Router::new()
        .route("/", post(settlements::create_settlement).get(settlements::list_settlements))
        .route("/calculate", post(settlements::calculate))
        .route(
            "/:id",
            get(settlements::get_settlement)
                .put(settlements::update_settlement)
                .delete(settlements::delete_settlement),
        );

    let api_routes = Router::new()
        .nest("/settlements", settlement_routes)
        .layer(axum_middleware::from_fn(request_log_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
