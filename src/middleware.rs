//! Response localization middleware and router wiring.
//!
//! The middleware decides each request's language, lets the route run, and
//! resolves the payload of any `Localized` response before it leaves the
//! server. Other responses pass through untouched.

use crate::i18n::{translate_to_json, Catalogs, Translator};
use crate::response::Untranslated;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Explicit per-request language, set by an upstream layer or extractor.
///
/// Takes precedence over the `Accept-Language` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale(pub String);

/// Determine the language to answer `request` in.
///
/// Order: `RequestLocale` extension, then `Accept-Language`, then the
/// configured default language.
pub fn request_language(request: &Request, catalogs: &Catalogs) -> Option<String> {
    if let Some(RequestLocale(code)) = request.extensions().get::<RequestLocale>() {
        return Some(code.clone());
    }

    match request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
    {
        Some(accept_language) => catalogs.negotiate_language(accept_language),
        None => catalogs.default_language().map(str::to_string),
    }
}

/// Middleware translating `Localized` responses for the request's language.
pub async fn localize_response(
    State(catalogs): State<Arc<Catalogs>>,
    request: Request,
    next: Next,
) -> Response {
    let language = request_language(&request, &catalogs);
    let translator = catalogs.translator(language.as_deref());
    debug!(
        "Localizing {} {} for {:?}",
        request.method(),
        request.uri().path(),
        translator.language()
    );

    let response = next.run(request).await;
    localize(response, &translator, &catalogs)
}

fn localize(mut response: Response, translator: &Translator, catalogs: &Catalogs) -> Response {
    let Some(Untranslated(payload)) = response.extensions_mut().remove::<Untranslated>() else {
        return response;
    };

    match translate_to_json(&payload, &|key: &str| translator.gettext(key)) {
        Ok(translated) => {
            let (mut parts, _) = response.into_parts();
            let (_, body) = Json(translated).into_response().into_parts();

            parts.headers.remove(header::CONTENT_LENGTH);
            if let Some(language) = translator.language() {
                if let Ok(value) = HeaderValue::from_str(&language.replace('_', "-")) {
                    parts.headers.insert(header::CONTENT_LANGUAGE, value);
                }
            }
            Response::from_parts(parts, body)
        }
        Err(e) => {
            catalogs.metrics().record_translation_failure();
            error!(
                "Failed to localize response for {:?}: {}",
                translator.language(),
                e
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Install response localization on every route of a router.
pub trait LocalizeRouterExt {
    #[must_use]
    fn localized(self, catalogs: Arc<Catalogs>) -> Self;
}

impl<S> LocalizeRouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn localized(self, catalogs: Arc<Catalogs>) -> Self {
        self.layer(middleware::from_fn_with_state(catalogs, localize_response))
    }
}
