//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::common::utils::geocoding::Geocoder;
use crate::common::utils::openai::OpenAiClient;
use crate::domains::auth::JwtService;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{ai, auth, health_handler, listings, reviews, users};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
    pub geocoder: Arc<Geocoder>,
    /// None when no API key is configured; the AI routes then answer 502
    pub openai: Option<Arc<OpenAiClient>>,
}

/// Build the Axum application router
///
/// Auth is non-blocking middleware: it attaches an `AuthUser` extension when
/// a valid token is present and otherwise lets the request through, so
/// public routes and protected routes share one pipeline. Handlers opt in
/// to authentication via the `CurrentUser` extractor.
pub fn build_app(
    pool: PgPool,
    jwt_secret: &str,
    jwt_issuer: String,
    geocoder_url: Option<String>,
    openai_api_key: Option<String>,
) -> Router {
    let jwt_service = Arc::new(JwtService::new(jwt_secret, jwt_issuer));
    let geocoder = Arc::new(Geocoder::new(geocoder_url));
    let openai = openai_api_key.map(|key| Arc::new(OpenAiClient::new(key)));

    // Create shared app state
    let app_state = AppState {
        db_pool: pool,
        jwt_service: jwt_service.clone(),
        geocoder,
        openai,
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Rate limiting configuration for credential endpoints
    // 5 requests per second with burst of 20, keyed by client IP
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(5) // Base rate: 5 requests per second
            .burst_size(20) // Allow bursts up to 20
            .use_headers() // Extract IP from X-Forwarded-For header
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    // Credential endpoints carry the rate limit; everything else does not
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .layer(rate_limit_layer);

    // Clone jwt_service for middleware closure
    let jwt_service_for_middleware = jwt_service.clone();

    Router::new()
        // Health check (no auth)
        .route("/health", get(health_handler))
        .nest("/auth", auth_routes)
        // Listings
        .route(
            "/listings",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route(
            "/listings/:id",
            get(listings::get_listing)
                .put(listings::update_listing)
                .delete(listings::delete_listing),
        )
        // Reviews
        .route("/listings/:id/reviews", post(reviews::create_review))
        .route(
            "/listings/:id/reviews/:review_id",
            put(reviews::update_review).delete(reviews::delete_review),
        )
        // Favorites
        .route("/users/me/favorites", get(users::get_favorites))
        .route(
            "/users/me/favorites/:listing_id",
            post(users::add_favorite).delete(users::remove_favorite),
        )
        // AI assists
        .route("/ai/generate-description", post(ai::generate_description))
        .route("/ai/summarize-reviews", post(ai::summarize_reviews))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        })) // JWT authentication
        .layer(Extension(app_state)) // Add shared state (must be after middlewares that need it)
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
}
