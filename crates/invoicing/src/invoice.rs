use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use invoicedesk_core::{CustomerId, DomainError, InvoiceId};

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for InvoiceStatus {
    type Err = DomainError;

    /// Exact match only: no trimming, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(DomainError::validation(format!("unknown invoice status '{other}'"))),
        }
    }
}

/// Stored invoice row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    /// Amount in smallest currency unit (cents).
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Values for a row about to be inserted. Storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: CustomerId,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// The mutable subset of an invoice.
///
/// There is no id or date here: an update can only ever touch these three columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: CustomerId,
    pub amount: i64,
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn from_new(id: InvoiceId, new: NewInvoice) -> Self {
        Self {
            id,
            customer_id: new.customer_id,
            amount: new.amount,
            status: new.status,
            date: new.date,
        }
    }

    /// Apply an update in place. `id` and `date` are left as they are.
    pub fn apply(&mut self, changes: InvoiceChanges) {
        self.customer_id = changes.customer_id;
        self.amount = changes.amount;
        self.status = changes.status;
    }
}

/// Largest amount the validator accepts. Below it every cent value is an exact
/// integer in both `f64` and the `BIGINT` column.
pub const MAX_AMOUNT: f64 = 90_000_000_000_000.0;

/// Convert a decimal currency amount into whole cents (rounded to the nearest cent).
///
/// `amount` must lie within `0..=MAX_AMOUNT`.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
