//! Route table.

use crate::handlers::{auth, health, users};
use crate::middleware::{correlation_id_layer, rate_limit};
use crate::state::AppState;
use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{get, post},
};
use sps_auth::providers::UserRepository;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Build the application router.
///
/// ```text
/// GET    /                      banner
/// GET    /health                liveness
/// GET    /metrics               Prometheus text
/// GET    /auth/challenge        rate limited
/// POST   /auth/login-challenge  rate limited
/// POST   /auth/login            rate limited
/// GET    /users                 bearer token
/// POST   /users                 bearer token
/// GET    /users/:id             bearer token
/// PUT    /users/:id             bearer token
/// DELETE /users/:id             bearer token
/// ```
///
/// Every response carries `X-Content-Type-Options: nosniff`,
/// `X-Frame-Options: SAMEORIGIN` and `Referrer-Policy: no-referrer` unless
/// the handler set them.
pub fn app_router<U: UserRepository + 'static>(state: AppState<U>) -> Router {
    let auth_routes = Router::new()
        .route("/auth/challenge", get(auth::challenge::<U>))
        .route("/auth/login-challenge", post(auth::login_challenge::<U>))
        .route("/auth/login", post(auth::login::<U>))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::<U>,
        ));

    let user_routes = Router::new()
        .route(
            "/users",
            get(users::list_users::<U>).post(users::create_user::<U>),
        )
        .route(
            "/users/:id",
            get(users::get_user::<U>)
                .put(users::update_user::<U>)
                .delete(users::delete_user::<U>),
        );

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics::<U>))
        .merge(auth_routes)
        .merge(user_routes)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(correlation_id_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
