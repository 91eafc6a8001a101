use anyhow::{anyhow, Result};
use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, request::Parts, HeaderName, HeaderValue, Response, StatusCode},
};

use wisp::{http_helpers, Body, HttpRequest, HttpResponse};

use wisp::RouteAdapter;

pub struct AxumRouteAdapter;

impl RouteAdapter for AxumRouteAdapter {
    type Request = (Parts, Bytes);
    type Response = Response<axum::body::Body>;

    fn adapt_request((parts, bytes): Self::Request) -> Result<HttpRequest> {
        let uri = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path());

        let mut request = HttpRequest::new(parts.method.as_str(), uri, Body::from_bytes(&bytes));
        request.headers = parts
            .headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or("").to_string()))
            .collect();

        Ok(request)
    }

    fn adapt_response(
        response: Box<dyn http_helpers::IntoResponse<Response = HttpResponse>>,
    ) -> Result<Self::Response> {
        let response = response.to_response();

        let status =
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let (body, default_type) = match response.body {
            Some(Body::Text(text)) => (axum::body::Body::from(text), "text/plain"),
            Some(Body::Json(json)) => {
                let vec = serde_json::to_vec(&json)
                    .map_err(|e| anyhow!("Failed to serialize JSON: {}", e))?;
                (axum::body::Body::from(vec), "application/json")
            }
            _ => (axum::body::Body::empty(), "text/plain"),
        };

        let mut res = Response::builder()
            .status(status)
            .body(body)
            .map_err(|e| anyhow!("Failed to build response: {}", e))?;

        let headers = res.headers_mut();
        for (k, v) in &response.headers {
            if let (Ok(name), Ok(value)) =
                (HeaderName::from_bytes(k.as_bytes()), HeaderValue::from_str(v))
            {
                headers.insert(name, value);
            }
        }
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(default_type));
        }

        Ok(res)
    }
}
