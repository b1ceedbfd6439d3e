use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{CustomerRepository, Result, StorageError};
use crate::domain::customer::{Customer, NewCustomer};

/// In-memory customer store.
///
/// Rows live in a Vec so listings keep insertion order. Inserts check the
/// email and push under one write lock, which makes the uniqueness check
/// atomic.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<Vec<Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, bypassing validation.
    #[cfg(test)]
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        Self {
            customers: RwLock::new(customers),
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.customers.read().await.len()
    }

    async fn filter<F>(&self, predicate: F) -> Vec<Customer>
    where
        F: Fn(&Customer) -> bool,
    {
        self.customers
            .read()
            .await
            .iter()
            .filter(|c| predicate(c))
            .cloned()
            .collect()
    }
}

fn eq_ci(stored: &str, wanted: &str) -> bool {
    stored.to_lowercase() == wanted.to_lowercase()
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>> {
        Ok(self.customers.read().await.clone())
    }

    async fn find_by_id(&self, global_id: &str) -> Result<Option<Customer>> {
        Ok(self
            .customers
            .read()
            .await
            .iter()
            .find(|c| c.global_id == global_id)
            .cloned())
    }

    async fn find_by_first_name_ci(&self, first_name: &str) -> Result<Vec<Customer>> {
        Ok(self.filter(|c| eq_ci(&c.first_name, first_name)).await)
    }

    async fn find_by_last_name_ci(&self, last_name: &str) -> Result<Vec<Customer>> {
        Ok(self.filter(|c| eq_ci(&c.last_name, last_name)).await)
    }

    async fn find_by_first_and_last_name_ci(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Customer>> {
        Ok(self
            .filter(|c| eq_ci(&c.first_name, first_name) && eq_ci(&c.last_name, last_name))
            .await)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.customers.read().await.iter().any(|c| c.email == email))
    }

    async fn insert(&self, customer: NewCustomer) -> Result<Customer> {
        let mut customers = self.customers.write().await;

        if customers.iter().any(|c| c.email == customer.email) {
            return Err(StorageError::DuplicateEmail(customer.email));
        }
        if customers.iter().any(|c| c.global_id == customer.global_id) {
            return Err(StorageError::Unavailable(format!(
                "global id collision: {}",
                customer.global_id
            )));
        }

        let stored = customer.into_customer(Utc::now());
        customers.push(stored.clone());
        Ok(stored)
    }

    async fn update_address(&self, global_id: &str, address: &str) -> Result<bool> {
        let mut customers = self.customers.write().await;

        match customers.iter_mut().find(|c| c.global_id == global_id) {
            Some(customer) => {
                customer.address = address.to_string();
                customer.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
