use actix_web::{
    http::header::CONTENT_TYPE, web::Bytes, HttpRequest as ActixHttpRequest,
    HttpResponse as ActixHttpResponse,
};
use anyhow::{anyhow, Result};

use wisp::{Body, HttpRequest, HttpResponse, IntoResponse, RouteAdapter};

pub struct ActixRouteAdapter;

impl ActixRouteAdapter {
    fn adapt_actix_request(req: ActixHttpRequest, body: Bytes) -> HttpRequest {
        let uri = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| req.path());

        let mut request = HttpRequest::new(req.method().as_str(), uri, Body::from_bytes(&body));
        request.headers = req
            .headers()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or("").to_string()))
            .collect();

        request
    }

    fn adapt_actix_response(
        response: Box<dyn IntoResponse<Response = HttpResponse>>,
    ) -> Result<ActixHttpResponse> {
        let response = response.to_response();

        let status = actix_web::http::StatusCode::from_u16(response.status)
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

        let mut actix_response = ActixHttpResponse::build(status);

        for (key, value) in &response.headers {
            actix_response.insert_header((key.as_str(), value.as_str()));
        }

        let default_type = |builder: &mut actix_web::HttpResponseBuilder, content_type: &'static str| {
            if response.header(CONTENT_TYPE.as_str()).is_none() {
                builder.content_type(content_type);
            }
        };

        let actix_response = match &response.body {
            Some(Body::Text(text)) => {
                default_type(&mut actix_response, "text/plain");
                actix_response.body(text.clone())
            }
            Some(Body::Json(json)) => {
                let json_str = serde_json::to_string(json)
                    .map_err(|e| anyhow!("Failed to serialize JSON: {}", e))?;
                default_type(&mut actix_response, "application/json");
                actix_response.body(json_str)
            }
            _ => actix_response.finish(),
        };

        Ok(actix_response)
    }
}

impl RouteAdapter for ActixRouteAdapter {
    type Request = (ActixHttpRequest, Bytes);
    type Response = ActixHttpResponse;

    fn adapt_request(request: Self::Request) -> Result<HttpRequest> {
        Ok(Self::adapt_actix_request(request.0, request.1))
    }

    fn adapt_response(
        response: Box<dyn IntoResponse<Response = HttpResponse>>,
    ) -> Result<Self::Response> {
        Self::adapt_actix_response(response)
    }
}
