//! Form actions behind the dashboard routes.
//!
//! Each invoice action validates the raw submission, performs one store write,
//! then either asks the caller to navigate or hands a [`FormState`] back to the
//! form. Storage failures are logged and reduced to a fixed message.

use chrono::Utc;
use tracing::instrument;

use invoicedesk_auth::{AuthErrorKind, CredentialsProvider, Session, auth_error_kind};
use invoicedesk_core::{FormData, InvoiceId};
use invoicedesk_infra::{InvoiceStore, RouteCache};
use invoicedesk_invoicing::{CREATE_INVOICE, FormState, UPDATE_INVOICE};

use crate::app::services::AppServices;

/// Listing route, invalidated by every successful write.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

const CREATE_INVALID: &str = "Missing Fields. Failed to Create Invoice.";
const CREATE_FAILED: &str = "Database error: failed to create invoice";
const UPDATE_INVALID: &str = "Missing Fields. Failed to Update Invoice.";
const UPDATE_FAILED: &str = "Database error: failed to update invoice";
const DELETE_DONE: &str = "Deleting invoice successfully";
const DELETE_FAILED: &str = "Database error: failed to delete invoice";

const INVALID_CREDENTIALS: &str = "Invalid credentials.";
const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Navigate to this path.
    Redirect(&'static str),
    /// Stay on the form and show this state.
    State(FormState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticateOutcome {
    SignedIn(Session),
    /// User-facing failure message.
    Failed(String),
}

/// The previous state is accepted for form-hook compatibility and not read.
#[instrument(skip_all)]
pub async fn create_invoice(
    services: &AppServices,
    _prev: &FormState,
    form: &FormData,
) -> ActionOutcome {
    let input = match CREATE_INVOICE.validate(form) {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!(fields = errors.len(), "create rejected");
            return ActionOutcome::State(FormState::invalid(errors, CREATE_INVALID));
        }
    };

    let invoice = input.into_new_invoice(Utc::now().date_naive());
    match services.invoices.insert(invoice).await {
        Ok(id) => tracing::info!(invoice_id = %id, "invoice created"),
        Err(e) => {
            tracing::error!(error = %e, "failed to create invoice");
            return ActionOutcome::State(FormState::message(CREATE_FAILED));
        }
    }

    services.cache.revalidate_path(INVOICES_PATH);
    ActionOutcome::Redirect(INVOICES_PATH)
}

#[instrument(skip(services, _prev, form), fields(invoice_id = %id))]
pub async fn update_invoice(
    services: &AppServices,
    id: &InvoiceId,
    _prev: &FormState,
    form: &FormData,
) -> ActionOutcome {
    let input = match UPDATE_INVOICE.validate(form) {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!(fields = errors.len(), "update rejected");
            return ActionOutcome::State(FormState::invalid(errors, UPDATE_INVALID));
        }
    };

    match services.invoices.update(id, input.into_changes()).await {
        Ok(0) => tracing::warn!(rows_affected = 0, "update matched no invoice"),
        Ok(rows) => tracing::info!(rows_affected = rows, "invoice updated"),
        Err(e) => {
            tracing::error!(error = %e, "failed to update invoice");
            return ActionOutcome::State(FormState::message(UPDATE_FAILED));
        }
    }

    services.cache.revalidate_path(INVOICES_PATH);
    ActionOutcome::Redirect(INVOICES_PATH)
}

/// Never navigates: the caller stays on the listing.
#[instrument(skip(services), fields(invoice_id = %id))]
pub async fn delete_invoice(services: &AppServices, id: &InvoiceId) -> FormState {
    match services.invoices.delete(id).await {
        Ok(rows) => {
            tracing::info!(rows_affected = rows, "invoice deleted");
            services.cache.revalidate_path(INVOICES_PATH);
            FormState::message(DELETE_DONE)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to delete invoice");
            FormState::message(DELETE_FAILED)
        }
    }
}

/// Sign in through the `"credentials"` provider.
///
/// Authentication failures become a message. Anything else is returned as an
/// error for the caller to surface.
#[instrument(skip_all)]
pub async fn authenticate(
    services: &AppServices,
    _prev: Option<&str>,
    form: &FormData,
) -> anyhow::Result<AuthenticateOutcome> {
    let err = match services.auth.sign_in(CredentialsProvider::ID, form).await {
        Ok(session) => return Ok(AuthenticateOutcome::SignedIn(session)),
        Err(err) => err,
    };

    match auth_error_kind(&err) {
        Some(AuthErrorKind::CredentialsSignin) => {
            Ok(AuthenticateOutcome::Failed(INVALID_CREDENTIALS.to_string()))
        }
        Some(kind) => {
            tracing::warn!(?kind, error = %err, "sign-in failed");
            Ok(AuthenticateOutcome::Failed(SOMETHING_WENT_WRONG.to_string()))
        }
        None => Err(err),
    }
}
