//! Postgres-backed invoice store.
//!
//! Ids travel as text and are cast to `uuid` in SQL, so a malformed id
//! surfaces as a [`StoreError::Database`] rather than being rejected here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use invoicedesk_core::{CustomerId, InvoiceId};
use invoicedesk_invoicing::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};

use super::{InvoiceStore, StoreError};

#[derive(Debug, Clone)]
pub struct PostgresInvoiceStore {
    pool: Arc<PgPool>,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn invoice_from_row(row: &PgRow) -> Result<Invoice, StoreError> {
    let id: String = row.try_get("id")?;
    let customer_id: String = row.try_get("customer_id")?;
    let amount: i64 = row.try_get("amount")?;
    let status: String = row.try_get("status")?;
    let date: NaiveDate = row.try_get("date")?;

    Ok(Invoice {
        id: InvoiceId::parse(id).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        customer_id: CustomerId::parse(customer_id)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        amount,
        status: status
            .parse::<InvoiceStatus>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        date,
    })
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    #[instrument(skip(self, invoice), fields(amount = invoice.amount), err)]
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1::uuid, $2, $3, $4)
            RETURNING id::text AS id
            "#,
        )
        .bind(invoice.customer_id.as_str())
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .fetch_one(&*self.pool)
        .await?;

        let id: String = row.try_get("id")?;
        InvoiceId::parse(id).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    #[instrument(skip(self, changes), fields(invoice_id = %id), err)]
    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $1::uuid, amount = $2, status = $3
            WHERE id = $4::uuid
            "#,
        )
        .bind(changes.customer_id.as_str())
        .bind(changes.amount)
        .bind(changes.status.as_str())
        .bind(id.as_str())
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn delete(&self, id: &InvoiceId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1::uuid")
            .bind(id.as_str())
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            WHERE id = $1::uuid
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&*self.pool)
        .await?;

        row.as_ref().map(invoice_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            ORDER BY date DESC, id
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        rows.iter().map(invoice_from_row).collect()
    }
}
