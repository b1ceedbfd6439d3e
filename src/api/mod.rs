// ============================================================================
// HTTP API
// ============================================================================
//
// GET  /api/customers[?firstName=&lastName=]  → 200 [CustomerView]
// GET  /api/customers/{id}                    → 200 CustomerView | 404
// POST /api/customers                         → 201 {id} | 400
// PUT  /api/customers/{id}/address            → 204 | 400 | 404
//
// Everything under /api requires HTTP Basic credentials.
//
// ============================================================================

mod errors;
mod handlers;
mod security;

pub use security::ApiCredentials;

use actix_web::middleware::from_fn;
use actix_web::web;

use errors::{json_config, query_config};
use security::require_basic_auth;

/// Register the customer routes. The caller supplies `Data<CustomerService>`
/// and `Data<ApiCredentials>` as app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/customers")
            .app_data(json_config())
            .app_data(query_config())
            .wrap(from_fn(require_basic_auth))
            .route("", web::get().to(handlers::list_customers))
            .route("", web::post().to(handlers::create_customer))
            .route("/{id}", web::get().to(handlers::get_customer))
            .route("/{id}/address", web::put().to(handlers::update_customer_address)),
    );
}

// ============================================================================
// HTTP Tests
// ============================================================================
