//! Invoicing domain module.
//!
//! Invoice records, the invoice form schema, and the state object handed back
//! to a form after a failed submission. Pure logic: no IO, no HTTP, no storage.

pub mod invoice;
pub mod schema;
pub mod state;

pub use invoicedesk_core::FormData;
pub use invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice, MAX_AMOUNT, to_cents};
pub use schema::{
    CREATE_INVOICE, Field, FieldErrors, INVOICE_FORM, InvoiceForm, InvoiceSchema, UPDATE_INVOICE,
};
pub use state::FormState;
