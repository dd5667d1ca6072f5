//! Evergreen Orders
//!
//! Headless ordering service for a seasonal tree-delivery storefront.
//!
//! ## Features
//! - Checkout domain as a library: wizard step sequencer, immutable order
//!   draft with cart mutators, price aggregation
//! - Storefront catalog reads (species, fullness variants, heights, stands,
//!   wreaths, delivery options)
//! - Order submission with concurrent line-item writes and a best-effort
//!   staff notification
//! - Admin catalog and order management

pub mod admin;
pub mod catalog;
pub mod domain;
pub mod notify;
pub mod orders;

use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::notify::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub notifier: Notifier,
}

pub(crate) fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "evergreen-orders"})) }))
        .route("/api/v1/species", get(catalog::list_species))
        .route("/api/v1/species/:id/variants", get(catalog::list_species_variants))
        .route("/api/v1/species/:id/heights", get(catalog::list_species_heights))
        .route("/api/v1/stands", get(catalog::list_stands))
        .route("/api/v1/wreaths", get(catalog::list_wreaths))
        .route("/api/v1/delivery-options", get(catalog::list_delivery_options))
        .route("/api/v1/orders/quote", post(orders::quote_order))
        .route("/api/v1/orders", post(orders::submit_order))
        .route("/api/v1/admin/species", get(admin::list_species).post(admin::create_species))
        .route("/api/v1/admin/species/:id", patch(admin::update_species))
        .route("/api/v1/admin/species/:id/variants", get(admin::list_variants))
        .route("/api/v1/admin/variants/:id", patch(admin::update_variant))
        .route("/api/v1/admin/species/:id/heights", get(admin::list_heights).post(admin::create_height))
        .route("/api/v1/admin/heights/:id", patch(admin::update_height).delete(admin::delete_height))
        .route("/api/v1/admin/stands", get(admin::list_stands).post(admin::create_stand))
        .route("/api/v1/admin/stands/:id", patch(admin::update_stand))
        .route("/api/v1/admin/wreaths", get(admin::list_wreaths).post(admin::create_wreath))
        .route("/api/v1/admin/wreaths/:id", patch(admin::update_wreath))
        .route("/api/v1/admin/delivery-options", get(admin::list_delivery_options))
        .route("/api/v1/admin/delivery-options/:id", patch(admin::update_delivery_option))
        .route("/api/v1/admin/orders", get(orders::list_orders))
        .route("/api/v1/admin/orders/:id/status", patch(orders::update_order_status))
        .route("/api/v1/admin/orders/:id", delete(orders::delete_order))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
