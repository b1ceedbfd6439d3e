use std::sync::Arc;

use crate::metrics::Metrics;
use crate::storage::CustomerRepository;

use super::commands::{CreateCustomer, UpdateAddress};
use super::errors::CustomerError;
use super::model::{generate_global_id, CustomerView};
use super::validation;

// ============================================================================
// Customer Service
// ============================================================================
//
// Orchestrates: Payload → Validation → Repository → CustomerView
//
// ============================================================================

pub type Result<T> = std::result::Result<T, CustomerError>;

#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
    metrics: Option<Arc<Metrics>>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self {
            repository,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn list_all(&self) -> Result<Vec<CustomerView>> {
        let customers = self.repository.find_all().await?;
        tracing::debug!(count = customers.len(), "Listed customers");
        Ok(customers.into_iter().map(CustomerView::from).collect())
    }

    pub async fn find_by_first_name(&self, first_name: &str) -> Result<Vec<CustomerView>> {
        let customers = self.repository.find_by_first_name_ci(first_name).await?;
        tracing::debug!(first_name, count = customers.len(), "Searched customers by first name");
        Ok(customers.into_iter().map(CustomerView::from).collect())
    }

    pub async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<CustomerView>> {
        let customers = self.repository.find_by_last_name_ci(last_name).await?;
        tracing::debug!(last_name, count = customers.len(), "Searched customers by last name");
        Ok(customers.into_iter().map(CustomerView::from).collect())
    }

    pub async fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<CustomerView>> {
        let customers = self
            .repository
            .find_by_first_and_last_name_ci(first_name, last_name)
            .await?;
        tracing::debug!(
            first_name,
            last_name,
            count = customers.len(),
            "Searched customers by first and last name"
        );
        Ok(customers.into_iter().map(CustomerView::from).collect())
    }

    /// Dispatch on whichever name filters are present. Both filters combine
    /// with AND; no filter lists everything.
    pub async fn search(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Vec<CustomerView>> {
        match (first_name, last_name) {
            (Some(first), Some(last)) => self.find_by_first_and_last_name(first, last).await,
            (Some(first), None) => self.find_by_first_name(first).await,
            (None, Some(last)) => self.find_by_last_name(last).await,
            (None, None) => self.list_all().await,
        }
    }

    pub async fn find_by_global_id(&self, global_id: &str) -> Result<CustomerView> {
        match self.repository.find_by_id(global_id).await? {
            Some(customer) => Ok(customer.into()),
            None => {
                tracing::warn!(global_id, "Customer not found");
                Err(CustomerError::NotFound(global_id.to_string()))
            }
        }
    }

    /// Validate, reject taken emails, assign a fresh global id and persist.
    /// Returns the new global id.
    pub async fn create(&self, payload: CreateCustomer) -> Result<String> {
        let new_customer = payload.validate_into(generate_global_id())?;

        if self.repository.exists_by_email(&new_customer.email).await? {
            return Err(self.conflict(new_customer.email));
        }

        // The store enforces uniqueness again; a concurrent insert that won
        // the race surfaces here as DuplicateEmail
        let stored = match self.repository.insert(new_customer).await {
            Ok(stored) => stored,
            Err(e) => match CustomerError::from(e) {
                CustomerError::AlreadyExists(email) => return Err(self.conflict(email)),
                other => return Err(other),
            },
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_customer_created();
        }
        tracing::info!(global_id = %stored.global_id, "Customer created");

        Ok(stored.global_id)
    }

    /// Overwrite the address of an existing customer.
    pub async fn update_address(&self, global_id: &str, payload: UpdateAddress) -> Result<()> {
        validation::check(&payload)?;
        let address = payload.address.unwrap_or_default();

        if !self.repository.update_address(global_id, &address).await? {
            tracing::warn!(global_id, "Failed to update address, customer not found");
            return Err(CustomerError::NotFound(global_id.to_string()));
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_address_update();
        }
        tracing::info!(global_id, "Customer address updated");

        Ok(())
    }

    fn conflict(&self, email: String) -> CustomerError {
        if let Some(metrics) = &self.metrics {
            metrics.record_conflict();
        }
        tracing::warn!(email = %email, "Failed to create customer, email already exists");
        CustomerError::AlreadyExists(email)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
