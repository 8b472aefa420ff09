//! HTTP API: form actions, routing, and session handling.

pub mod app;
pub mod context;
pub mod middleware;
