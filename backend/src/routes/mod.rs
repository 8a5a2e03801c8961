//! Route definitions for the Glass Rental Management Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/sign-out", post(handlers::sign_out))
        .route("/auth/session", get(handlers::get_session))
        // Customer management
        .nest("/customers", customer_routes())
        // Glassware catalog
        .nest("/glassware", glassware_routes())
        // Stock accounting
        .nest("/stock", stock_routes())
        // Rental orders
        .nest("/orders", order_routes())
        // Dashboards and exports
        .nest("/reports", report_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .route("/auth/sign-up", post(handlers::sign_up))
        .route("/auth/sign-in", post(handlers::sign_in))
        .merge(protected)
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
}

fn glassware_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_glassware).post(handlers::create_glassware),
        )
        .route(
            "/:glassware_id",
            get(handlers::get_glassware)
                .put(handlers::update_glassware)
                .delete(handlers::delete_glassware),
        )
}

fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_stock_overview))
        .route("/for-orders", get(handlers::get_stock_for_orders))
        .route("/alerts", get(handlers::get_stock_alerts))
        .route("/available/:glass_type", get(handlers::get_available_glasses))
        .route("/adjustments", get(handlers::list_stock_adjustments))
        .route("/adjust", post(handlers::adjust_stock))
        .route("/restock", post(handlers::restock_item))
        .route("/damage", post(handlers::report_damage))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/:order_id",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/inventory-overview", get(handlers::get_inventory_overview))
        .route("/summary", get(handlers::get_report_summary))
        .route("/customers", get(handlers::get_customers_report))
        .route("/inventory", get(handlers::get_inventory_report))
        .route("/orders", get(handlers::get_orders_report))
}
