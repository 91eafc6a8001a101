use std::time::Duration;

use serde_json::{json, Value};
use wisp::{
    async_trait, Application, HttpAdapter, HttpMethod, HttpRequest, HttpResponse, Params,
    RouteHandler, Service, ServiceResult,
};
use wisp_axum::AxumAdapter;

struct Greetings;

#[async_trait]
impl Service for Greetings {
    async fn find(&self, params: Params) -> ServiceResult {
        let name = params
            .query
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("world")
            .to_string();
        Ok(json!({ "greeting": format!("Hello, {}!", name) }))
    }

    async fn create(&self, data: Value, _params: Params) -> ServiceResult {
        Ok(json!({ "echo": data }))
    }
}

struct Ping;

#[async_trait]
impl RouteHandler for Ping {
    async fn handle(&self, _req: HttpRequest) -> HttpResponse {
        HttpResponse::html("<p>pong</p>".to_string())
    }
}

#[tokio::test]
async fn test_axum_e2e() {
    let port = 18091;

    tokio::spawn(async move {
        let mut app = Application::new();
        app.use_service("/greetings", Greetings)
            .use_handler("/ping", HttpMethod::GET, Ping);
        let _ = app.listen(AxumAdapter::new(), port, "127.0.0.1").await;
    });

    tokio::time::sleep(Duration::from_millis(500)).await;

    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}", port);

    let res = client
        .get(format!("{}/greetings?name=axum", base))
        .send()
        .await
        .expect("GET request failed");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "greeting": "Hello, axum!" }));

    let res = client
        .post(format!("{}/greetings", base))
        .json(&json!({ "text": "hi" }))
        .send()
        .await
        .expect("POST request failed");
    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "echo": { "text": "hi" } }));

    let res = client
        .delete(format!("{}/greetings/1", base))
        .send()
        .await
        .expect("DELETE request failed");
    assert_eq!(res.status(), 405);

    let res = client
        .get(format!("{}/ping", base))
        .send()
        .await
        .expect("GET request failed");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/html; charset=utf-8");
    assert_eq!(res.text().await.unwrap(), "<p>pong</p>");
}
