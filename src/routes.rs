use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers::{langs, system, translations, users};
use crate::middleware::{localize, require_auth};
use crate::state::AppState;

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.server.upload_max_bytes;

    Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        .fallback(system::not_found)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn_with_state(state.clone(), localize))
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/login", post(users::login))
        .route("/api/v1/users/refresh-token/:token", get(users::refresh_token))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(lang_routes())
        .merge(translation_routes())
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", get(users::find_all).post(users::create))
        .route("/api/v1/users/", get(users::find_all).post(users::create))
        .route("/api/v1/users/logout", put(users::logout))
        .route(
            "/api/v1/users/:id",
            get(users::find_by_id)
                .put(users::update)
                .delete(users::delete),
        )
}

fn lang_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/lang", get(langs::find_all).post(langs::create))
        .route("/api/v1/lang/", get(langs::find_all).post(langs::create))
        .route(
            "/api/v1/lang/:id",
            get(langs::find_by_id)
                .put(langs::update)
                .delete(langs::delete),
        )
}

fn translation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/translation",
            get(translations::find_all).post(translations::create),
        )
        .route(
            "/api/v1/translation/",
            get(translations::find_all).post(translations::create),
        )
        .route(
            "/api/v1/translation/:id",
            get(translations::find_by_id)
                .put(translations::update)
                .delete(translations::delete),
        )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);
    ApiError::InternalServerError.into_response()
}
