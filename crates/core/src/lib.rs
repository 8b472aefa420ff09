//! `invoicedesk-core`: shared domain building blocks.
//!
//! Identifiers, raw form submissions, and the domain error type. No IO, no
//! HTTP, no storage.

pub mod error;
pub mod form;
pub mod id;

pub use error::DomainError;
pub use form::FormData;
pub use id::{CustomerId, InvoiceId, UserId};
