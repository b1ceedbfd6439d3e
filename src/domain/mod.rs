// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Customer records: validation rules, the error taxonomy and the service
// that maps requests onto the repository. No HTTP or SQL in here.
//
// ============================================================================

pub mod customer;
