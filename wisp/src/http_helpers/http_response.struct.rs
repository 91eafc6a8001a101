use super::Body;

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Option<Body>,
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn json(status: u16, json: serde_json::Value) -> Self {
        Self {
            status,
            body: Some(Body::Json(json)),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
        }
    }

    pub fn html(html: String) -> Self {
        Self {
            status: 200,
            body: Some(Body::Text(html)),
            headers: vec![(
                "content-type".to_string(),
                "text/html; charset=utf-8".to_string(),
            )],
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}
