//! Route table and middleware stack

use std::time::Duration;

use axum::{
    http::{HeaderName, StatusCode},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{auth, cart, categories, groups, health, menu_items, orders};
use crate::middleware::require_auth;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    // Public routes (no authentication)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/users", post(auth::register))
        .route("/auth/token/login", post(auth::login));

    // Protected routes (bearer token + throttling)
    let protected_routes = Router::new()
        .route("/auth/users/me", get(auth::me))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category).delete(categories::delete_category),
        )
        .route(
            "/menu-items",
            get(menu_items::list_menu_items).post(menu_items::create_menu_item),
        )
        .route(
            "/menu-items/{id}",
            get(menu_items::get_menu_item)
                .put(menu_items::update_menu_item)
                .patch(menu_items::patch_menu_item)
                .delete(menu_items::delete_menu_item),
        )
        .route(
            "/groups/{group}/users",
            get(groups::list_members).post(groups::add_member),
        )
        .route("/groups/{group}/users/{id}", delete(groups::remove_member))
        .route(
            "/cart/menu-items",
            get(cart::list_cart)
                .post(cart::add_to_cart)
                .delete(cart::clear_cart),
        )
        .route("/orders", get(orders::list_orders).post(orders::place_order))
        .route(
            "/orders/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .patch(orders::patch_order_status)
                .delete(orders::delete_order),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
