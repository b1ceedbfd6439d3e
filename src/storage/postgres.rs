use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;

use super::{CustomerRepository, Result, StorageError};
use crate::config::DatabaseConfig;
use crate::domain::customer::{Customer, NewCustomer};

// ============================================================================
// PostgreSQL Customer Repository
// ============================================================================
//
// Uniqueness of email and global_id is enforced by named table constraints,
// so two concurrent inserts with the same email cannot both commit. The
// surrogate `id` column orders listings and never leaves this module.
//
// ============================================================================

pub const EMAIL_UNIQUE_CONSTRAINT: &str = "customers_email_unique";

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS customers (
    id          BIGSERIAL PRIMARY KEY,
    global_id   TEXT         NOT NULL,
    first_name  VARCHAR(50)  NOT NULL,
    last_name   VARCHAR(50)  NOT NULL,
    email       TEXT         NOT NULL,
    age         INTEGER      NOT NULL,
    address     VARCHAR(255) NOT NULL,
    created_at  TIMESTAMPTZ  NOT NULL,
    updated_at  TIMESTAMPTZ  NOT NULL,
    CONSTRAINT customers_global_id_unique UNIQUE (global_id),
    CONSTRAINT customers_email_unique UNIQUE (email)
)";

// Expression indexes back the case-insensitive name lookups
const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS customers_first_name_ci ON customers (lower(first_name))",
    "CREATE INDEX IF NOT EXISTS customers_last_name_ci ON customers (lower(last_name))",
];

const SELECT_COLUMNS: &str =
    "SELECT global_id, first_name, last_name, email, age, address, created_at, updated_at FROM customers";

pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool sized from config.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Create the customers table and its indexes if they are missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        for statement in CREATE_INDEXES {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        tracing::info!("Customer schema ready");
        Ok(())
    }

    async fn fetch_where(&self, clause: &str, params: &[&str]) -> Result<Vec<Customer>> {
        let sql = select_sql(clause);
        let mut query = sqlx::query(&sql);
        for param in params {
            query = query.bind(*param);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(customer_from_row).collect()
    }
}

fn select_sql(clause: &str) -> String {
    if clause.is_empty() {
        format!("{SELECT_COLUMNS} ORDER BY id")
    } else {
        format!("{SELECT_COLUMNS} WHERE {clause} ORDER BY id")
    }
}

fn customer_from_row(row: &PgRow) -> Result<Customer> {
    Ok(Customer {
        global_id: row.try_get("global_id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        age: row.try_get("age")?,
        address: row.try_get("address")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

/// Translate a unique violation on the email constraint into `DuplicateEmail`.
fn map_insert_error(error: sqlx::Error, email: &str) -> StorageError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() && db_error.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            return StorageError::DuplicateEmail(email.to_string());
        }
    }
    StorageError::Database(error)
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>> {
        self.fetch_where("", &[]).await
    }

    async fn find_by_id(&self, global_id: &str) -> Result<Option<Customer>> {
        let row = sqlx::query(&select_sql("global_id = $1"))
            .bind(global_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(customer_from_row).transpose()
    }

    async fn find_by_first_name_ci(&self, first_name: &str) -> Result<Vec<Customer>> {
        self.fetch_where("lower(first_name) = lower($1)", &[first_name])
            .await
    }

    async fn find_by_last_name_ci(&self, last_name: &str) -> Result<Vec<Customer>> {
        self.fetch_where("lower(last_name) = lower($1)", &[last_name])
            .await
    }

    async fn find_by_first_and_last_name_ci(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Customer>> {
        self.fetch_where(
            "lower(first_name) = lower($1) AND lower(last_name) = lower($2)",
            &[first_name, last_name],
        )
        .await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn insert(&self, customer: NewCustomer) -> Result<Customer> {
        let stored = customer.into_customer(Utc::now());

        sqlx::query(
            "INSERT INTO customers (
                global_id, first_name, last_name, email, age, address, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&stored.global_id)
        .bind(&stored.first_name)
        .bind(&stored.last_name)
        .bind(&stored.email)
        .bind(stored.age)
        .bind(&stored.address)
        .bind(stored.created_at)
        .bind(stored.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &stored.email))?;

        tracing::debug!(global_id = %stored.global_id, "Inserted customer row");
        Ok(stored)
    }

    async fn update_address(&self, global_id: &str, address: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE customers SET address = $2, updated_at = $3 WHERE global_id = $1",
        )
        .bind(global_id)
        .bind(address)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
//
// Queries against a live PostgreSQL are not exercised here; these tests pin
// the SQL shape and error translation.
//
// ============================================================================
