use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Customer Model
// ============================================================================

/// A stored customer record.
///
/// `global_id` is the only identifier that leaves the service; the storage
/// key of the row stays inside the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub global_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A customer about to be inserted, already carrying its assigned global id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub global_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub address: String,
}

impl NewCustomer {
    pub fn into_customer(self, now: DateTime<Utc>) -> Customer {
        Customer {
            global_id: self.global_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            age: self.age,
            address: self.address,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Generate a fresh global id. Never derived from customer data.
pub fn generate_global_id() -> String {
    Uuid::new_v4().to_string()
}

/// Customer as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub address: String,
}

impl From<Customer> for CustomerView {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.global_id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            age: customer.age,
            address: customer.address,
        }
    }
}

/// Body of a successful creation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerIdResponse {
    pub id: String,
}
