use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};

use invoicedesk_core::{FormData, InvoiceId};
use invoicedesk_infra::{InvoiceStore, RouteCache};
use invoicedesk_invoicing::FormState;

use crate::app::actions::{self, INVOICES_PATH};
use crate::app::errors;
use crate::app::routes::common::{form_state_response, see_other};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices))
        .route("/create", post(create_invoice))
        .route("/:id", get(get_invoice))
        .route("/:id/edit", post(update_invoice))
        .route("/:id/delete", post(delete_invoice))
}

pub async fn dashboard() -> Response {
    see_other(INVOICES_PATH)
}

/// Invoices newest first, served from the route cache when warm.
pub async fn list_invoices(Extension(services): Extension<Arc<AppServices>>) -> Response {
    if let Some(body) = services.cache.get(INVOICES_PATH) {
        return json_body(body);
    }

    let generation = services.cache.generation();
    let invoices = match services.invoices.list().await {
        Ok(v) => v,
        Err(e) => return errors::store_error_to_response(e),
    };
    let body = match serde_json::to_string(&invoices) {
        Ok(b) => b,
        Err(e) => return errors::internal_error(e.into()),
    };

    let cached = services.cache.put(INVOICES_PATH, body.clone(), generation);
    let stats = services.cache.stats();
    tracing::debug!(
        count = invoices.len(),
        cached,
        hits = stats.hits,
        misses = stats.misses,
        invalidations = stats.invalidations,
        "invoice list rendered"
    );
    json_body(body)
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match InvoiceId::parse(id) {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found"),
    };

    match services.invoices.get(&id).await {
        Ok(Some(invoice)) => Json(invoice).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<FormData>,
) -> Response {
    actions::create_invoice(&services, &FormState::default(), &form)
        .await
        .into_response()
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(form): Form<FormData>,
) -> Response {
    let id = match InvoiceId::parse(id) {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found"),
    };

    actions::update_invoice(&services, &id, &FormState::default(), &form)
        .await
        .into_response()
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match InvoiceId::parse(id) {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found"),
    };

    form_state_response(actions::delete_invoice(&services, &id).await)
}

fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use chrono::Duration;
    use serde_json::Value;
    use tokio::sync::Notify;

    use invoicedesk_infra::{
        InMemoryInvoiceStore, InMemoryRouteCache, InMemorySessionStore, InMemoryUserDirectory,
        StoreError,
    };
    use invoicedesk_invoicing::{Invoice, InvoiceChanges, NewInvoice};

    /// Pauses the first `list` after it has read its snapshot.
    #[derive(Default)]
    struct PausingStore {
        inner: InMemoryInvoiceStore,
        armed: AtomicBool,
        paused: Notify,
        resume: Notify,
    }

    #[async_trait]
    impl InvoiceStore for PausingStore {
        async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError> {
            self.inner.insert(invoice).await
        }

        async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
            self.inner.update(id, changes).await
        }

        async fn delete(&self, id: &InvoiceId) -> Result<u64, StoreError> {
            self.inner.delete(id).await
        }

        async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
            self.inner.get(id).await
        }

        async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
            let snapshot = self.inner.list().await?;
            if self.armed.swap(false, Ordering::SeqCst) {
                self.paused.notify_one();
                self.resume.notified().await;
            }
            Ok(snapshot)
        }
    }

    async fn body_json(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn write_during_a_listing_read_is_visible_on_the_next_read() {
        let store = Arc::new(PausingStore::default());
        store.armed.store(true, Ordering::SeqCst);
        let services = Arc::new(AppServices::new(
            store.clone(),
            Arc::new(InMemoryRouteCache::new()),
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(InMemorySessionStore::new()),
            Duration::hours(1),
        ));

        let reader = tokio::spawn(list_invoices(Extension(services.clone())));
        store.paused.notified().await;

        let form: FormData = [("customerId", "c1"), ("amount", "12.00"), ("status", "paid")]
            .into_iter()
            .collect();
        let outcome = actions::create_invoice(&services, &FormState::default(), &form).await;
        assert_eq!(outcome, actions::ActionOutcome::Redirect(INVOICES_PATH));

        store.resume.notify_one();
        let stale = body_json(reader.await.unwrap()).await;
        assert_eq!(stale.as_array().map(Vec::len), Some(0));

        let fresh = body_json(list_invoices(Extension(services.clone())).await).await;
        assert_eq!(fresh.as_array().map(Vec::len), Some(1));
        assert_eq!(services.cache.stats().stale_puts, 1);
    }
}
