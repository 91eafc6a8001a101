use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, head, options, patch, post, put},
    Router,
};
use wisp::{HttpAdapter, HttpMethod, RouteAdapter, RouteHandler};

use super::AxumRouteAdapter;

#[derive(Clone)]
pub struct AxumAdapter {
    instance: Router,
}

async fn dispatch(req: Request<Body>, handler: Arc<dyn RouteHandler>) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read request body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match AxumRouteAdapter::handle_request((parts, bytes), handler).await {
        Ok(res) => res,
        Err(e) => {
            tracing::error!(error = %e, "failed to adapt response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl HttpAdapter for AxumAdapter {
    fn new() -> Self {
        Self {
            instance: Router::new(),
        }
    }

    fn add_route(&mut self, path: &str, method: HttpMethod, handler: Arc<dyn RouteHandler>) {
        let route_handler = move |req: Request<Body>| dispatch(req, handler.clone());
        tracing::debug!(path, %method, "adding route");

        // Same path, different methods: axum merges the method routers.
        let router = std::mem::take(&mut self.instance);
        self.instance = match method {
            HttpMethod::GET => router.route(path, get(route_handler)),
            HttpMethod::POST => router.route(path, post(route_handler)),
            HttpMethod::PUT => router.route(path, put(route_handler)),
            HttpMethod::DELETE => router.route(path, delete(route_handler)),
            HttpMethod::HEAD => router.route(path, head(route_handler)),
            HttpMethod::PATCH => router.route(path, patch(route_handler)),
            HttpMethod::OPTIONS => router.route(path, options(route_handler)),
        };
    }

    async fn listen(self, port: u16, hostname: &str) -> Result<()> {
        let addr = format!("{}:{}", hostname, port);
        let listener: TcpListener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        tracing::info!(%addr, "listening");

        axum::serve(listener, self.instance)
            .await
            .with_context(|| "Axum server encountered an error")?;
        Ok(())
    }
}
