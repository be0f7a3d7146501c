use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, system};

/// Application routes
pub fn configure_routes() -> Router {
    let business = Router::new()
        // A001 Material
        .route(
            "/api/material",
            get(handlers::a001_material::list_all).post(handlers::a001_material::upsert),
        )
        .route(
            "/api/material/list",
            get(handlers::a001_material::list_paginated),
        )
        .route(
            "/api/material/testdata",
            post(handlers::a001_material::insert_test_data),
        )
        .route(
            "/api/material/:id",
            get(handlers::a001_material::get_by_id).delete(handlers::a001_material::delete),
        )
        // A002 Tool
        .route(
            "/api/tool",
            get(handlers::a002_tool::list_all).post(handlers::a002_tool::upsert),
        )
        .route("/api/tool/list", get(handlers::a002_tool::list_paginated))
        .route(
            "/api/tool/:id",
            get(handlers::a002_tool::get_by_id).delete(handlers::a002_tool::delete),
        )
        // A003 Budget
        .route(
            "/api/budget",
            get(handlers::a003_budget::list_open).post(handlers::a003_budget::upsert),
        )
        .route(
            "/api/budget/statuses",
            get(handlers::a003_budget::statuses),
        )
        .route(
            "/api/budget/:id",
            get(handlers::a003_budget::get_by_id).delete(handlers::a003_budget::delete),
        )
        .route(
            "/api/budget/:id/status",
            put(handlers::a003_budget::change_status),
        )
        // P900 Sales
        .route("/api/sales", get(handlers::p900_sales::report))
        .route_layer(middleware::from_fn(system::auth::middleware::require_auth));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // System users management (admin only)
        .route(
            "/api/system/users",
            get(system::handlers::users::list)
                .post(system::handlers::users::create)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id/change-password",
            post(system::handlers::users::change_password)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // ========================================
        // BUSINESS ROUTES (authenticated)
        // ========================================
        .merge(business)
}
