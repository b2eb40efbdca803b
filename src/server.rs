//! Demo HTTP application showing localized JSON responses.

use crate::i18n::{lazy_gettext, Catalogs, LazyString, MetricsReport, Payload};
use crate::middleware::{LocalizeRouterExt, RequestLocale};
use crate::response::Localized;
use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GreetingQuery {
    pub name: Option<String>,
}

/// Request body whose `title` is echoed back translated.
#[derive(Debug, Deserialize)]
pub struct EchoRequest {
    pub title: LazyString,
    pub note: Option<String>,
}

/// Build the demo router.
///
/// Localized routes honour `?lang=` and `Accept-Language`; `/health` and
/// `/localization/metrics` are plain JSON.
pub fn app(catalogs: Arc<Catalogs>) -> Router {
    let localized = Router::new()
        .route("/greeting", get(greeting))
        .route("/items", get(items))
        .route("/echo", post(echo))
        .localized(Arc::clone(&catalogs))
        .layer(middleware::from_fn(locale_from_query));

    Router::new()
        .route("/health", get(health))
        .route("/localization/metrics", get(metrics))
        .with_state(catalogs)
        .merge(localized)
        .layer(TraceLayer::new_for_http())
}

/// Turn a `lang` query parameter into a `RequestLocale`.
async fn locale_from_query(mut request: Request, next: Next) -> Response {
    let lang = Query::<LangQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(query)| query.lang)
        .filter(|lang| !lang.trim().is_empty());

    if let Some(lang) = lang {
        request.extensions_mut().insert(RequestLocale(lang));
    }
    next.run(request).await
}

async fn greeting(Query(query): Query<GreetingQuery>) -> Localized {
    let message = match query.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => lazy_gettext("Hello, {name}!").with("name", name),
        _ => lazy_gettext("Hello, stranger!"),
    };

    Localized::new(
        Payload::object()
            .insert("message", message)
            .insert("hint", lazy_gettext("Add ?lang=es to any request to switch language")),
    )
}

async fn items() -> Localized {
    let stock = [("Apple", 1, 3), ("Pear", 2, 0)];

    let items: Vec<Payload> = stock
        .iter()
        .map(|&(name, id, count)| {
            let availability = if count == 0 {
                lazy_gettext("Out of stock")
            } else {
                lazy_gettext("{count} left").with("count", count)
            };
            Payload::object()
                .insert("id", id)
                .insert("name", lazy_gettext(name))
                .insert("availability", availability)
        })
        .collect();

    Localized::new(
        Payload::object()
            .insert("items", items)
            .insert("total", stock.len()),
    )
}

async fn echo(Json(body): Json<EchoRequest>) -> Localized {
    Localized::with_status(
        StatusCode::CREATED,
        Payload::object()
            .insert("title", body.title)
            .insert("note", body.note)
            .insert("detail", lazy_gettext("Saved")),
    )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics(State(catalogs): State<Arc<Catalogs>>) -> Json<MetricsReport> {
    Json(catalogs.metrics().report())
}
