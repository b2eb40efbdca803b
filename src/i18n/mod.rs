//! Internationalization (i18n) core: lazy strings and payload translation.
//!
//! Messages are marked for translation when business code produces them, and
//! resolved only when the response is serialized and the request's language is
//! known.
//!
//! # Architecture
//!
//! - `lazy`: `LazyString`, a template plus named values awaiting translation
//! - `payload`: `Payload`, JSON-shaped values whose leaves may be lazy
//! - `translator`: the pure recursive resolver over payloads
//! - `interpolate`: `{name}` placeholder substitution
//! - `catalog`: gettext catalog loading with identity fallback
//! - `language`: language code normalization and `Accept-Language` parsing
//! - `metrics`: catalog lookup observability
//!
//! # Example
//!
//! ```rust
//! use api_localization::i18n::{lazy_gettext, translate_to_json, Payload};
//!
//! let payload = Payload::object()
//!     .insert("greeting", lazy_gettext("Hi {name}").with("name", "Ann"))
//!     .insert("count", 3);
//!
//! let spanish = |key: &str| match key {
//!     "Hi {name}" => "Hola {name}".to_string(),
//!     other => other.to_string(),
//! };
//! let json = translate_to_json(&payload, &spanish)?;
//! assert_eq!(json, serde_json::json!({"greeting": "Hola Ann", "count": 3}));
//! # Ok::<(), api_localization::i18n::TranslateError>(())
//! ```

mod catalog;
mod interpolate;
mod language;
mod lazy;
mod metrics;
mod payload;
mod translator;

pub use catalog::{catalog_path, get_gettext, Catalogs, Translator};
pub use interpolate::interpolate;
pub use language::{
    candidate_codes, normalize_language_code, parse_accept_language, primary_subtag,
    LanguageRange,
};
pub use lazy::{lazy_gettext, LazyString};
pub use metrics::{LocalizationMetrics, MetricsReport};
pub use payload::Payload;
pub use translator::{translate, translate_to_json, TranslateError};

#[cfg(test)]
pub(crate) use catalog::tests::write_catalog;
