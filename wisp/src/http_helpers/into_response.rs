use std::fmt::Debug;

use serde_json::Value;

use super::{Body, HttpResponse};

pub trait IntoResponse: Debug {
    type Response;

    fn to_response(&self) -> Self::Response;
}

impl IntoResponse for HttpResponse {
    type Response = Self;

    fn to_response(&self) -> Self {
        self.clone()
    }
}

impl IntoResponse for (u16, Value) {
    type Response = HttpResponse;

    fn to_response(&self) -> Self::Response {
        HttpResponse::json(self.0, self.1.clone())
    }
}

impl IntoResponse for Value {
    type Response = HttpResponse;

    fn to_response(&self) -> Self::Response {
        HttpResponse::json(200, self.clone())
    }
}

impl IntoResponse for String {
    type Response = HttpResponse;

    fn to_response(&self) -> Self::Response {
        HttpResponse {
            body: Some(Body::Text(self.clone())),
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            ..HttpResponse::new()
        }
    }
}
