//! Content translator: resolves every lazy string inside a payload.
//!
//! The translator is a pure function over the payload tree. It receives the
//! translate function explicitly, so it never consults ambient locale state and
//! is safe to call from any number of requests at once.

use crate::i18n::Payload;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while resolving lazy strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The translated text references a placeholder that was never supplied.
    #[error("placeholder '{name}' is referenced by \"{template}\" but was not supplied")]
    MissingPlaceholder { name: String, template: String },

    /// The translated text has an unbalanced `{` or `}`.
    #[error("unbalanced brace at byte {position} in \"{template}\"")]
    MalformedTemplate { template: String, position: usize },
}

/// Resolve all lazy strings in `value` using `translate_fn`.
///
/// Objects and arrays are rebuilt with the same shape and ordering; object
/// keys are never translated. All other values are returned as they are.
///
/// # Example
/// ```
/// use api_localization::i18n::{lazy_gettext, translate, Payload};
///
/// let payload = Payload::object().insert("greeting", lazy_gettext("Hi {name}").with("name", "Ann"));
/// let resolved = translate(&payload, &|s: &str| s.to_string()).unwrap();
/// assert_eq!(resolved.get("greeting"), Some(&Payload::from("Hi Ann")));
/// ```
pub fn translate<F>(value: &Payload, translate_fn: &F) -> Result<Payload, TranslateError>
where
    F: Fn(&str) -> String + ?Sized,
{
    match value {
        Payload::Lazy(lazy) => lazy.resolve(translate_fn).map(Payload::String),
        Payload::Object(entries) => entries
            .iter()
            .map(|(key, child)| Ok((key.clone(), translate(child, translate_fn)?)))
            .collect::<Result<Vec<_>, _>>()
            .map(Payload::Object),
        Payload::Array(items) => items
            .iter()
            .map(|item| translate(item, translate_fn))
            .collect::<Result<Vec<_>, _>>()
            .map(Payload::Array),
        other => Ok(other.clone()),
    }
}

/// Resolve `value` and convert the result straight into JSON.
pub fn translate_to_json<F>(value: &Payload, translate_fn: &F) -> Result<Value, TranslateError>
where
    F: Fn(&str) -> String + ?Sized,
{
    translate(value, translate_fn).map(Payload::into_json)
}
