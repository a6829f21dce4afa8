use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected::cars, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full router for the given state
pub fn app(state: AppState) -> Router {
    let uploads_route = state.images.route();
    let uploads = ServeDir::new(state.images.dir());
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .nest_service(&uploads_route, uploads)
        // Protected API
        .merge(car_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn car_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/cars", get(cars::list).post(cars::create))
        .route("/api/cars/search/:query", get(cars::search))
        .route(
            "/api/cars/:id",
            get(cars::show).patch(cars::update).delete(cars::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
