//! Infrastructure layer: configuration, Postgres, and the store adapters.

pub mod config;
pub mod db;
pub mod invoice_store;
pub mod route_cache;
pub mod session_store;
pub mod user_store;

pub use config::{AppConfig, ConfigError, DevUser};
pub use invoice_store::{InMemoryInvoiceStore, InvoiceStore, PostgresInvoiceStore, StoreError};
pub use route_cache::{CacheStats, InMemoryRouteCache, RouteCache};
pub use session_store::InMemorySessionStore;
pub use user_store::{InMemoryUserDirectory, PostgresUserDirectory};
