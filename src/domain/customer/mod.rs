// ============================================================================
// Customer Domain
// ============================================================================
//
// - Model (Customer, NewCustomer, CustomerView)
// - Commands (CreateCustomer, UpdateAddress request payloads)
// - Validation (field rules, violation list)
// - Errors (CustomerError)
// - Service (CustomerService)
//
// Storage and HTTP live outside this module.
//
// ============================================================================

pub mod model;
pub mod commands;
pub mod validation;
pub mod errors;
pub mod service;

// Re-export for convenience
pub use model::*;
pub use commands::*;
pub use validation::FieldViolation;
pub use errors::*;
pub use service::CustomerService;
