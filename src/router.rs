use crate::{
    auth::{self, USER_ID_HEADER},
    handlers, AppState,
};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_credentials(true)
}

pub fn build_router(app_state: AppState) -> Router {
    // Routes that need the X-User-Id header
    let user_routes = Router::new()
        .route("/api/jobs", get(handlers::list_jobs_handler))
        .route("/api/recommended", get(handlers::list_recommended_handler))
        .route("/api/apply", post(handlers::apply_handler))
        .route("/api/applied", get(handlers::applied_jobs_handler))
        .route("/api/analytics", get(handlers::analytics_handler))
        .layer(middleware::from_fn(auth::require_user_id));

    let mut app = Router::new()
        .route("/api/auth/login", post(auth::handlers::login_handler))
        // TODO: decide whether catalog ingestion should require an owner id
        .route("/api/admin/recommend", post(handlers::recommend_handler))
        .route("/health", get(handlers::health_handler))
        .route("/debug", get(handlers::debug_handler))
        .merge(user_routes);

    if let Some(static_dir) = &app_state.settings.static_dir {
        tracing::info!("Serving client assets from {}", static_dir.display());
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    app.layer(cors_layer(&app_state.settings.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
