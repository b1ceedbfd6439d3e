// ============================================================================
// Storage - Customer persistence
// ============================================================================
//
// CustomerRepository is the only thing the service knows about storage.
// Implementations:
// - PostgresCustomerRepository: sqlx + PostgreSQL, uniqueness by constraint
// - InMemoryCustomerRepository: tests and `storage.backend = "memory"`
//
// Name lookups are case-insensitive exact matches. Listings come back in
// insertion order.
//
// ============================================================================

mod memory;
mod postgres;

pub use memory::InMemoryCustomerRepository;
pub use postgres::PostgresCustomerRepository;

use async_trait::async_trait;

use crate::domain::customer::{Customer, NewCustomer};

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The store refused the write because another customer owns this email.
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Customer>>;

    async fn find_by_id(&self, global_id: &str) -> Result<Option<Customer>>;

    async fn find_by_first_name_ci(&self, first_name: &str) -> Result<Vec<Customer>>;

    async fn find_by_last_name_ci(&self, last_name: &str) -> Result<Vec<Customer>>;

    async fn find_by_first_and_last_name_ci(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Customer>>;

    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Insert a new customer. Must fail with `DuplicateEmail` atomically when
    /// the email is taken, even under concurrent inserts.
    async fn insert(&self, customer: NewCustomer) -> Result<Customer>;

    /// Overwrite the address of an existing customer.
    /// Returns false when no customer has this global id; never inserts.
    async fn update_address(&self, global_id: &str, address: &str) -> Result<bool>;
}
