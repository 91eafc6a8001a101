//! # wisp-axum
//!
//! Axum adapter for wisp.
//!
//! This crate implements wisp's `HttpAdapter` trait for the Axum web framework,
//! so an [`Application`](wisp::Application) can be served by Axum.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wisp::{Application, HttpAdapter};
//! use wisp_axum::AxumAdapter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = Application::new();
//!     app.listen(AxumAdapter::new(), 3030, "127.0.0.1").await
//! }
//! ```

mod axum_adapter;
mod axum_route_adapter;

pub use axum_adapter::AxumAdapter;
pub use axum_route_adapter::AxumRouteAdapter;

pub use wisp::{HttpAdapter, RouteAdapter};
