//! # wisp-actix
//!
//! Actix-web adapter for wisp.
//!
//! This crate implements wisp's `HttpAdapter` trait for Actix-web, so an
//! [`Application`](wisp::Application) can be served by Actix.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wisp::{Application, HttpAdapter};
//! use wisp_actix::ActixAdapter;
//!
//! #[actix_web::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = Application::new();
//!     app.listen(ActixAdapter::new(), 3030, "127.0.0.1").await
//! }
//! ```

mod actix_adapter;
mod actix_route_adapter;

pub use actix_adapter::ActixAdapter;
pub use actix_route_adapter::ActixRouteAdapter;

pub use wisp::{HttpAdapter, RouteAdapter};
