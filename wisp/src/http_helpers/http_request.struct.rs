use std::collections::HashMap;

use super::Body;

#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub body: Body,
    pub headers: Vec<(String, String)>,
    pub method: String,
    pub path: String,
    pub uri: String,
    pub query_params: HashMap<String, String>,
}

impl HttpRequest {
    /// Build a request from a method and a uri, splitting and decoding the
    /// query string.
    pub fn new(method: &str, uri: &str, body: Body) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };

        Self {
            body,
            headers: Vec::new(),
            method: method.to_uppercase(),
            path: path.to_string(),
            uri: uri.to_string(),
            query_params: parse_query_string(query),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Get a reference to the headers
    pub fn headers(&self) -> &Vec<(String, String)> {
        &self.headers
    }

    /// Get a specific header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check if a header exists
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }
}

/// Decode an `application/x-www-form-urlencoded` query string. Malformed
/// input yields an empty map; a repeated key keeps its last value.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}
