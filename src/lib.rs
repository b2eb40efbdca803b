//! Transparent localization of JSON API responses.
//!
//! Business code marks user-facing messages with [`i18n::lazy_gettext`] and
//! returns them inside a [`response::Localized`] payload. The
//! [`middleware::localize_response`] layer picks each request's language and
//! resolves every lazy string against gettext catalogs just before the
//! response is sent.

pub mod config;
pub mod i18n;
pub mod middleware;
pub mod response;
pub mod server;
