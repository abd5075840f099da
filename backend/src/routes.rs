use axum::{
    Router,
    routing::{delete, get, post, put},
};
use rentledger::stat::Estate;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services;

pub fn app() -> Router<AppState> {
    Router::new()
        .route("/", get(services::root))
        // properties
        .route(
            "/properties",
            get(services::list_properties_handler).post(services::create_property_handler),
        )
        .route(
            "/properties/{property_id}",
            get(services::get_property_handler)
                .put(services::update_property_handler)
                .delete(services::delete_property_handler),
        )
        .route("/properties/{property_id}/stats", get(services::property_stats_handler))
        // categories
        .route("/properties/{property_id}/categories", post(services::create_category_handler))
        .route(
            "/properties/{property_id}/categories/{category_id}",
            put(services::update_category_handler).delete(services::delete_category_handler),
        )
        // units
        .route(
            "/properties/{property_id}/categories/{category_id}/units",
            post(services::create_unit_handler),
        )
        .route(
            "/properties/{property_id}/categories/{category_id}/units/bulk",
            post(services::create_bulk_units_handler),
        )
        .route(
            "/properties/{property_id}/categories/{category_id}/units/{unit_id}",
            put(services::update_unit_handler).delete(services::delete_unit_handler),
        )
        // tenants
        .route("/tenants", get(services::list_tenants_handler))
        .route("/properties/{property_id}/tenants", get(services::list_property_tenants_handler))
        .route(
            "/properties/{property_id}/categories/{category_id}/tenants/import",
            post(services::import_tenants_handler),
        )
        .route(
            "/properties/{property_id}/units/{unit_id}/tenant",
            post(services::assign_tenant_handler),
        )
        .route(
            "/properties/{property_id}/units/{unit_id}/tenant/{tenant_id}",
            delete(services::unassign_tenant_handler),
        )
        // payments
        .route("/payments", post(services::create_payment_handler))
        .route("/tenants/{tenant_id}/payments", get(services::list_payments_handler))
        .route(
            "/tenants/{tenant_id}/payments/history",
            get(services::payment_history_handler),
        )
        // dashboard
        .route("/dashboard", get(services::dashboard_handler))
        .route("/dashboard/properties", get(services::property_summaries_handler))
        .route("/dashboard/trend", get(services::income_trend_handler))
        // reports
        .route("/reports/rent-roll", get(services::rent_roll_handler))
        .route("/reports/arrears", get(services::arrears_handler))
        .route("/reports/vacancy", get(services::vacancy_handler))
}

#[derive(Clone)]
pub struct AppState {
    pub estate: Arc<RwLock<Estate>>,
}

impl AppState {
    pub fn new(estate: Estate) -> Self {
        Self {
            estate: Arc::new(RwLock::new(estate)),
        }
    }
}
