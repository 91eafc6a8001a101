//! # wisp
//!
//! Host seam for CRUD-shaped services: a registry that mounts services on
//! paths, runs their `after`/`error` hooks, publishes their events and maps
//! REST-style HTTP calls onto them. Servers are plugged in through
//! [`HttpAdapter`] (see `wisp-axum` and `wisp-actix`).
//!
//! ```rust
//! use serde_json::{json, Value};
//! use wisp::{async_trait, Application, Params, Service, ServiceResult};
//!
//! struct Messages;
//!
//! #[async_trait]
//! impl Service for Messages {
//!     async fn find(&self, _params: Params) -> ServiceResult {
//!         Ok(json!([{ "text": "hello" }]))
//!     }
//!
//!     async fn create(&self, data: Value, _params: Params) -> ServiceResult {
//!         Ok(data)
//!     }
//! }
//!
//! let mut app = Application::new();
//! app.use_service("/messages", Messages);
//! assert!(app.has_service("messages"));
//! ```

pub mod adapter;
mod application;
pub mod config;
mod errors;
pub mod hooks;
pub mod http_helpers;
mod service;

pub use adapter::{HttpAdapter, RouteAdapter, RouteHandler};
pub use application::Application;
pub use errors::ServiceError;
pub use hooks::{HookContext, HookMap, ServiceEvent, ServiceHandle};
pub use http_helpers::{Body, HttpMethod, HttpRequest, HttpResponse, IntoResponse};
pub use service::{Id, Params, Service, ServiceMethod, ServiceResult};

pub use async_trait::async_trait;
