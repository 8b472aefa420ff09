use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use invoicedesk_core::InvoiceId;
use invoicedesk_invoicing::{Invoice, InvoiceChanges, NewInvoice};

use super::{InvoiceStore, StoreError};

/// In-memory invoice table for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    inner: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Storage("invoice map lock poisoned".to_string())
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError> {
        let id = InvoiceId::generate();
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(id.clone(), Invoice::from_new(id.clone(), invoice));
        Ok(id)
    }

    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        match map.get_mut(id) {
            Some(invoice) => {
                invoice.apply(changes);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &InvoiceId) -> Result<u64, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(u64::from(map.remove(id).is_some()))
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut invoices: Vec<Invoice> = map.values().cloned().collect();
        invoices.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(invoices)
    }
}
