use async_trait::async_trait;

use crate::http_helpers::{HttpRequest, HttpResponse};

/// Anything that answers a request on a registered route.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(&self, req: HttpRequest) -> HttpResponse;
}
