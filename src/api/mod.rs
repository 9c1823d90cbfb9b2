//! HTTP API Handlers and Routes
//!
//! This module provides the HTTP layer for ragbot, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! - `GET /` - Chat UI (static HTML compiled into the binary)
//! - `POST /chat` - Send `{"message": ...}` and receive `{"response": ...}`
//! - `GET /health` - Health check endpoint
//!
//! `/chat` answers `200 OK` for every well-formed request. Pipeline failures
//! are reported in the `response` text, never as an error status.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
