//! End-to-end tests against a bound server.

mod common;

use common::{eventually, start_server, ROUTES};
use path_router::config::parse_config;

#[tokio::test]
async fn test_matched_routes_render_captures() {
    let server = start_server(ROUTES).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/users/42")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-route"], "show");
    assert_eq!(res.text().await.unwrap(), "user 42");

    let res = client.get(server.url("/archive/2024-05")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "2024/05");

    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "welcome");

    server.stop().await;
}

#[tokio::test]
async fn test_method_selects_sibling() {
    let server = start_server(ROUTES).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/users")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "all users");

    let res = client.post(server.url("/users")).send().await.unwrap();
    assert_eq!(res.status(), 201);
    assert_eq!(res.headers()["x-route"], "create");

    let res = client.delete(server.url("/users")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_unmatched_paths_are_not_found() {
    let server = start_server(ROUTES).await;
    let client = reqwest::Client::new();

    for path in ["/nothing", "/users/abc", "/users/42/", "/archive/2024-5"] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 404, "path {}", path);
        assert!(res.headers().get("x-route").is_none());
    }

    server.stop().await;
}

#[tokio::test]
async fn test_request_id_assigned_and_echoed() {
    let server = start_server(ROUTES).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/nothing")).send().await.unwrap();
    let id = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert_eq!(id.len(), 36);

    let res = client
        .get(server.url("/users/1"))
        .header("x-request-id", "trace-abc")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-abc");

    server.stop().await;
}

#[tokio::test]
async fn test_route_table_hot_swap() {
    let server = start_server(ROUTES).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let updated = parse_config(
        r#"
        [[routes]]
        name = "health"
        path = ["health"]
        body = "ok"
        "#,
    )
    .unwrap();
    server.updates.send(updated).unwrap();

    let url = server.url("/health");
    let swapped = eventually(|| {
        let client = client.clone();
        let url = url.clone();
        async move {
            match client.get(&url).send().await {
                Ok(res) => res.status() == 200,
                Err(_) => false,
            }
        }
    })
    .await;
    assert!(swapped, "new table never served /health");

    let res = client.get(server.url("/users/1")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let server = start_server(ROUTES).await;
    let url = server.url("/");
    server.stop().await;

    let result = reqwest::Client::new().get(&url).send().await;
    assert!(result.is_err());
}
