//! # Marketplace Gateway Crate
//!
//! HTTP surface of the campus marketplace: REST handlers over the database
//! repositories, the router that wires them together, and the cross-cutting
//! layers around it.
//!
//! ## Architecture
//!
//! - **REST**: one module per resource, each with its request/response types and OpenAPI annotations
//! - **Extract**: path, query and JSON extractors that reject with the JSON error body
//! - **State**: the repositories shared by every handler
//! - **Middleware**: request logging and CORS
//!
//! ## Usage
//!
//! ```rust,no_run
//! use marketplace_gateway::{create_router, GatewayState};
//!
//! # async fn run(pool: sqlx::SqlitePool) -> std::io::Result<()> {
//! let app = create_router(GatewayState::new(pool));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

pub mod docs;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod rest;
pub mod state;

pub use docs::ApiDoc;
pub use error::{ErrorResponse, GatewayError, GatewayResult};
pub use state::GatewayState;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Router};

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let arc_state = Arc::new(state);

    #[allow(unused_mut)]
    let mut router = Router::new()
        .route("/health", get(rest::health::health_check))
        .nest("/api", rest::create_rest_routes())
        .with_state(arc_state);

    #[cfg(feature = "swagger-ui")]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
        .layer(middleware::create_cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
