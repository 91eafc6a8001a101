use anyhow::{Context, Result};
use std::sync::Arc;

use actix_web::{
    dev::Server,
    http::Method,
    web::{self, Bytes},
    App, HttpRequest as ActixHttpRequest, HttpResponse as ActixHttpResponse, HttpServer,
};
use wisp::{HttpAdapter, HttpMethod, RouteAdapter, RouteHandler};

use super::ActixRouteAdapter;

#[derive(Clone)]
pub struct ActixAdapter {
    routes: Vec<RouteConfig>,
}

#[derive(Clone)]
struct RouteConfig {
    path: String,
    method: Method,
    handler: Arc<dyn RouteHandler>,
}

async fn dispatch(
    req: ActixHttpRequest,
    body: Bytes,
    handler: Arc<dyn RouteHandler>,
) -> ActixHttpResponse {
    match ActixRouteAdapter::handle_request((req, body), handler).await {
        Ok(res) => res,
        Err(e) => {
            tracing::error!(error = %e, "failed to adapt response");
            ActixHttpResponse::InternalServerError().finish()
        }
    }
}

impl HttpAdapter for ActixAdapter {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    fn add_route(&mut self, path: &str, method: HttpMethod, handler: Arc<dyn RouteHandler>) {
        tracing::debug!(path, %method, "adding route");

        let method = match method {
            HttpMethod::GET => Method::GET,
            HttpMethod::POST => Method::POST,
            HttpMethod::PUT => Method::PUT,
            HttpMethod::DELETE => Method::DELETE,
            HttpMethod::HEAD => Method::HEAD,
            HttpMethod::PATCH => Method::PATCH,
            HttpMethod::OPTIONS => Method::OPTIONS,
        };

        self.routes.push(RouteConfig {
            path: path.to_string(),
            method,
            handler,
        });
    }

    async fn listen(self, port: u16, hostname: &str) -> Result<()> {
        let addr = format!("{}:{}", hostname, port);
        let routes = Arc::new(self.routes);

        tracing::info!(%addr, "listening");

        let server: Server = HttpServer::new(move || {
            routes.iter().fold(App::new(), |app, route| {
                let handler = route.handler.clone();
                app.route(
                    &route.path,
                    web::method(route.method.clone()).to(
                        move |req: ActixHttpRequest, body: Bytes| {
                            dispatch(req, body, handler.clone())
                        },
                    ),
                )
            })
        })
        .bind(&addr)
        .with_context(|| format!("Failed to bind to {}", addr))?
        .run();

        server
            .await
            .with_context(|| "Actix server encountered an error")?;

        Ok(())
    }
}
