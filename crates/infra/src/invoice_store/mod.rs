//! Invoice persistence.
//!
//! Two adapters implement [`InvoiceStore`]: an in-memory map for local runs
//! and tests, and Postgres for everything else. Neither validates the row; the
//! invoice schema has already done that by the time a store is called.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use invoicedesk_core::InvoiceId;
use invoicedesk_invoicing::{Invoice, InvoiceChanges, NewInvoice};

mod in_memory;
mod postgres;

pub use in_memory::InMemoryInvoiceStore;
pub use postgres::PostgresInvoiceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(String),

    /// A stored row could not be read back into an [`Invoice`].
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a row and return the id the store assigned to it.
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError>;

    /// Overwrite customer, amount and status. Returns the number of rows
    /// touched; zero when `id` does not exist.
    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError>;

    /// Returns the number of rows removed.
    async fn delete(&self, id: &InvoiceId) -> Result<u64, StoreError>;

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// All invoices, newest date first.
    async fn list(&self) -> Result<Vec<Invoice>, StoreError>;
}

#[async_trait]
impl<S> InvoiceStore for Arc<S>
where
    S: InvoiceStore + ?Sized,
{
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError> {
        (**self).insert(invoice).await
    }

    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: &InvoiceId) -> Result<u64, StoreError> {
        (**self).delete(id).await
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        (**self).list().await
    }
}
