use std::future::Future;
use std::sync::Arc;

use anyhow::Result;

use super::RouteHandler;
use crate::http_helpers::{HttpRequest, HttpResponse, IntoResponse};

/// Converts between a server's native request/response types and the
/// host's [`HttpRequest`]/[`HttpResponse`].
pub trait RouteAdapter {
    type Request;
    type Response;

    /// `request` carries the already-buffered body, so this never awaits.
    fn adapt_request(request: Self::Request) -> Result<HttpRequest>;

    fn adapt_response(
        response: Box<dyn IntoResponse<Response = HttpResponse>>,
    ) -> Result<Self::Response>;

    fn handle_request(
        request: Self::Request,
        handler: Arc<dyn RouteHandler>,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        let http_request = Self::adapt_request(request);
        async move {
            let http_response = handler.handle(http_request?).await;
            Self::adapt_response(Box::new(http_response))
        }
    }
}
