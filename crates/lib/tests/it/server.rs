use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use warehouse::{Warehouse, constants::SERVICE_BANNER, server};

use super::helpers::*;

async fn test_app() -> (Router, Warehouse) {
    let warehouse = test_warehouse().await;
    (server::router(warehouse.clone()), warehouse)
}

/// Send one request and return the status plus the body parsed as JSON
/// (or as a JSON string when it is not JSON).
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn post_raw(app: &Router, uri: &str, raw: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_root_and_health() {
    let (app, warehouse) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String(SERVICE_BANNER.to_string()));

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], warehouse.backend().kind().as_str());
}

#[tokio::test]
async fn test_create_then_delete_round_trip() {
    let (app, _warehouse) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/mapas/create",
        Some(json!({"mapName": "Galpão A", "numberRunners": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Mapa criado com sucesso!");
    assert_eq!(body["map"]["mapName"], "Galpão A");
    assert_eq!(body["map"]["numberRunners"], 3);
    let runners = body["map"]["runners"].as_array().unwrap();
    assert_eq!(runners.len(), 3);
    assert_eq!(runners[0]["name"], "Corredor 1");
    assert_eq!(runners[2]["name"], "Corredor 3");
    let map_id = body["map"]["mapId"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/mapas/list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"mapId": map_id, "mapName": "Galpão A", "totalOccupiedShelves": 0}])
    );

    let (status, body) = send(&app, Method::DELETE, &format!("/mapas/{map_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Mapa deletado com sucesso!",
            "deletedMap": {"mapId": map_id, "name": "Galpão A"}
        })
    );

    let (status, body) = send(&app, Method::GET, "/mapas/list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (app, _warehouse) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/mapas/create",
        Some(json!({"numberRunners": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Nome do mapa é obrigatório.");
    assert_eq!(body["code"], "MISSING_FIELD");

    let (status, body) = send(
        &app,
        Method::POST,
        "/mapas/create",
        Some(json!({"mapName": "Galpão A", "numberRunners": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Número de corredores inválido. Deve ser um número inteiro positivo."
    );

    let (status, _) = send(
        &app,
        Method::POST,
        "/mapas/create",
        Some(json!({"mapName": "Galpão A", "numberRunners": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_raw(&app, "/mapas/create", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_create_duplicate_is_conflict() {
    let (app, _warehouse) = test_app().await;
    let request = json!({"mapName": "Galpão A", "numberRunners": "2"});

    let (status, _) = send(&app, Method::POST, "/mapas/create", Some(request.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/mapas/create", Some(request)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Já existe um mapa com este nome.");
    assert_eq!(body["code"], "MAP_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_search_endpoint() {
    let (app, warehouse) = test_app().await;
    let norte = create_map(&warehouse, "Galpão Norte", 2).await;
    create_map(&warehouse, "Depósito", 1).await;
    add_shelves(&warehouse, norte.runners[0].runner_id, "P", 3).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/mapas/search",
        Some(json!({"term": " Norte "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "1 mapa(s) encontrado(s)");
    assert_eq!(body["term"], "Norte");
    let map = &body["maps"][0];
    assert_eq!(map["mapId"], norte.map_id);
    assert_eq!(map["totalRunners"], 2);
    assert_eq!(map["totalOccupiedShelves"], 3);
    assert_eq!(map["runners"][1]["name"], "Corredor 2");
    assert!(map["runners"][1].get("mapId").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/mapas/search",
        Some(json!({"term": "Inexistente"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "message": "Nenhum mapa encontrado para o termo pesquisado.",
            "term": "Inexistente"
        })
    );

    let (status, body) = send(&app, Method::POST, "/mapas/search", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Termo de pesquisa é obrigatório.");
}

#[tokio::test]
async fn test_delete_errors() {
    let (app, _warehouse) = test_app().await;

    let (status, body) = send(&app, Method::DELETE, "/mapas/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "ID do mapa é obrigatório e deve ser um número válido."
    );

    let (status, body) = send(&app, Method::DELETE, "/mapas/987654", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Mapa não encontrado.");
    assert_eq!(body["code"], "MAP_NOT_FOUND");
}

#[tokio::test]
async fn test_list_counts_shelves() {
    let (app, warehouse) = test_app().await;
    let a = create_map(&warehouse, "Galpão A", 2).await;
    create_map(&warehouse, "Galpão B", 1).await;
    add_shelves(&warehouse, a.runners[0].runner_id, "X", 1).await;
    add_shelves(&warehouse, a.runners[1].runner_id, "Y", 2).await;

    let (status, body) = send(&app, Method::GET, "/mapas/list", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["totalOccupiedShelves"], 3);
    assert_eq!(list[1]["totalOccupiedShelves"], 0);
}
