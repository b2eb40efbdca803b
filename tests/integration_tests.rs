//! Integration tests for the localized API
//!
//! These tests drive the demo router end to end against the Spanish catalog
//! shipped under `locales/`, without binding a socket.

use api_localization::{
    i18n::{get_gettext, lazy_gettext, translate_to_json, Catalogs, Payload},
    middleware::{LocalizeRouterExt, RequestLocale},
    response::Localized,
    server,
};
use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

// ==================== Test Helpers ====================

fn locale_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("locales")
}

fn catalogs() -> Arc<Catalogs> {
    Arc::new(Catalogs::new("messages", locale_dir()))
}

fn request(method: Method, uri: &str, accept_language: Option<&str>, body: Body) -> Request {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(value) = accept_language {
        builder = builder.header(header::ACCEPT_LANGUAGE, value);
    }
    builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .expect("Failed to build request")
}

fn get_request(uri: &str, accept_language: Option<&str>) -> Request {
    request(Method::GET, uri, accept_language, Body::empty())
}

async fn send(app: Router, request: Request) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("Router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).expect("Body is not JSON");
    (status, body)
}

// ==================== Catalog Fixture Tests ====================

#[test]
fn test_shipped_spanish_catalog_loads() {
    let translator = get_gettext("messages", locale_dir(), Some("es"));
    assert!(!translator.is_identity());
    assert_eq!(translator.gettext("Untitled"), "Sin título");
    assert_eq!(translator.gettext("Not in catalog"), "Not in catalog");
}

#[test]
fn test_translate_with_shipped_catalog() {
    let translator = get_gettext("messages", locale_dir(), Some("es-AR"));
    let payload = Payload::object()
        .insert("stock", lazy_gettext("{count} left").with("count", 7))
        .insert("codes", vec![1, 2]);

    let json = translate_to_json(&payload, &|key: &str| translator.gettext(key)).unwrap();
    assert_eq!(json, json!({"stock": "Quedan 7", "codes": [1, 2]}));
}

#[test]
fn test_preload_finds_spanish() {
    assert_eq!(catalogs().preload(), vec!["es"]);
}

// ==================== Demo App Tests ====================

#[tokio::test]
async fn test_greeting_in_spanish() {
    let app = server::app(catalogs());
    let (status, body) = send(app, get_request("/greeting?name=Ann", Some("es-ES,es;q=0.9"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "¡Hola, Ann!");
    assert_eq!(
        body["hint"],
        "Usa ?lang=en en cualquier petición para cambiar de idioma"
    );
}

#[tokio::test]
async fn test_greeting_in_source_language() {
    let app = server::app(catalogs());
    let (status, body) = send(app, get_request("/greeting", Some("en-US"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello, stranger!");
}

#[tokio::test]
async fn test_query_locale_overrides_header() {
    let app = server::app(catalogs());
    let (_, body) = send(app, get_request("/greeting?lang=es", Some("en"))).await;
    assert_eq!(body["message"], "¡Hola, desconocido!");
}

#[tokio::test]
async fn test_unknown_language_falls_back_to_source_text() {
    let app = server::app(catalogs());
    let (status, body) = send(app, get_request("/greeting?lang=ja&name=Kenji", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello, Kenji!");
}

#[tokio::test]
async fn test_percent_encoded_query_locale() {
    for lang in ["es%5FAR", "es%2DMX", "%65s"] {
        let app = server::app(catalogs());
        let (status, body) = send(app, get_request(&format!("/greeting?lang={lang}"), None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "¡Hola, desconocido!", "{lang}");
    }
}

#[tokio::test]
async fn test_path_in_query_locale_is_ignored() {
    let spanish_dir = locale_dir().join("es");
    let absolute = spanish_dir.to_str().unwrap().replace(' ', "%20");

    for lang in ["../es", "..%2Fes", "../locales/es", absolute.as_str()] {
        let app = server::app(catalogs());
        let response = app
            .oneshot(get_request(&format!("/greeting?lang={lang}"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_LANGUAGE).is_none(), "{lang}");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Hello, stranger!", "{lang}");
    }
}

#[tokio::test]
async fn test_items_structure_preserved() {
    let app = server::app(catalogs());
    let (status, body) = send(app, get_request("/items", Some("es"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "items": [
                {"id": 1, "name": "Manzana", "availability": "Quedan 3"},
                {"id": 2, "name": "Pera", "availability": "Agotado"}
            ],
            "total": 2
        })
    );

    let keys: Vec<_> = body["items"][0].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["id", "name", "availability"]);
}

#[tokio::test]
async fn test_echo_translates_request_strings() {
    let app = server::app(catalogs());
    let body = Body::from(r#"{"title": "Untitled", "note": "Untitled"}"#);
    let (status, body) = send(app, request(Method::POST, "/echo", Some("es"), body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"title": "Sin título", "note": "Untitled", "detail": "Guardado"})
    );
}

#[tokio::test]
async fn test_health_is_not_localized() {
    let app = server::app(catalogs());
    let (status, body) = send(app, get_request("/health", Some("es"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_metrics_endpoint_reports_lookups() {
    let catalogs = catalogs();
    let app = server::app(Arc::clone(&catalogs));

    send(app.clone(), get_request("/items", Some("es"))).await;
    let (status, body) = send(app, get_request("/localization/metrics", None)).await;

    assert_eq!(status, StatusCode::OK);
    // Two names and two availability strings, all in the catalog
    assert_eq!(body["catalog_hits"], 4);
    assert_eq!(body["catalog_misses"], 0);
    assert_eq!(body["catalog_hit_rate"], 100.0);
}

// ==================== Custom Router Tests ====================

async fn force_spanish(mut request: Request, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(RequestLocale("es".to_string()));
    next.run(request).await
}

#[tokio::test]
async fn test_request_locale_set_by_upstream_layer() {
    let app = Router::new()
        .route("/saved", get(|| async { Localized::from(lazy_gettext("Saved")) }))
        .localized(catalogs())
        .layer(middleware::from_fn(force_spanish));

    let (_, body) = send(app, get_request("/saved", Some("en"))).await;
    assert_eq!(body, json!("Guardado"));
}

#[tokio::test]
async fn test_unlocalized_router_serves_templates() {
    let app = Router::new().route(
        "/saved",
        get(|| async { Localized::new(lazy_gettext("{count} left").with("count", 1)) }),
    );

    let (status, body) = send(app, get_request("/saved", Some("es"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("{count} left"));
}

#[tokio::test]
async fn test_default_language_used_without_header() {
    let catalogs = Arc::new(Catalogs::new("messages", locale_dir()).with_default_language("es"));
    let app = Router::new()
        .route("/saved", get(|| async { Localized::from(lazy_gettext("Saved")) }))
        .localized(catalogs);

    let (_, body) = send(app, get_request("/saved", None)).await;
    assert_eq!(body, json!("Guardado"));
}
