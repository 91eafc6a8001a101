use std::future::Future;
use std::sync::Arc;

use anyhow::Result;

use super::RouteHandler;
use crate::http_helpers::HttpMethod;

/// An HTTP server the [`Application`](crate::Application) can be hosted on.
pub trait HttpAdapter: Send + Sync {
    fn new() -> Self;
    fn add_route(&mut self, path: &str, method: HttpMethod, handler: Arc<dyn RouteHandler>);
    fn listen(self, port: u16, hostname: &str) -> impl Future<Output = Result<()>> + Send;
}
