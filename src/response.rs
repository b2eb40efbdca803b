//! JSON responses whose lazy strings are resolved per request.

use crate::i18n::{LazyString, Payload};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// A JSON response that the localization middleware translates.
///
/// The body written here renders lazy strings as their raw templates, so a
/// route without the middleware still answers with readable text. The
/// middleware swaps in the translated body for the request's language.
///
/// # Example
/// ```
/// use api_localization::i18n::{lazy_gettext, Payload};
/// use api_localization::response::Localized;
///
/// async fn handler() -> Localized {
///     Localized::new(Payload::object().insert("detail", lazy_gettext("Saved")))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Localized {
    status: StatusCode,
    payload: Payload,
}

impl Localized {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self::with_status(StatusCode::OK, payload)
    }

    pub fn with_status(status: StatusCode, payload: impl Into<Payload>) -> Self {
        Self {
            status,
            payload: payload.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

impl From<Payload> for Localized {
    fn from(payload: Payload) -> Self {
        Self::new(payload)
    }
}

impl From<LazyString> for Localized {
    fn from(lazy: LazyString) -> Self {
        Self::new(lazy)
    }
}

/// Response extension carrying the payload the middleware still has to resolve.
#[derive(Debug, Clone)]
pub(crate) struct Untranslated(pub(crate) Payload);

impl IntoResponse for Localized {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(&self.payload)).into_response();
        response.extensions_mut().insert(Untranslated(self.payload));
        response
    }
}
