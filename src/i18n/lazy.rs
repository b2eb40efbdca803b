//! Lazy strings: user-facing messages whose translation is deferred.
//!
//! A `LazyString` is created wherever business logic produces a message, long
//! before the target locale is known. It carries the message template (which
//! doubles as the catalog lookup key) and any named values to interpolate once
//! the translated text is available.

use crate::i18n::interpolate::interpolate;
use crate::i18n::TranslateError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// A message template plus named substitution values, awaiting translation.
///
/// Until it is resolved, a `LazyString` behaves like its raw template text:
/// it displays, compares, hashes and serializes as the template.
#[derive(Debug, Clone, Default)]
pub struct LazyString {
    template: String,
    placeholders: BTreeMap<String, String>,
}

impl LazyString {
    /// Create a lazy string without placeholders.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            placeholders: BTreeMap::new(),
        }
    }

    /// Create a lazy string with a set of named placeholder values.
    ///
    /// # Example
    /// ```
    /// use api_localization::i18n::LazyString;
    ///
    /// let lazy = LazyString::with_placeholders("{sent} of {total}", [("sent", 3), ("total", 5)]);
    /// assert_eq!(lazy.placeholder("total"), Some("5"));
    /// ```
    pub fn with_placeholders<K, V, I>(template: impl Into<String>, placeholders: I) -> Self
    where
        K: Into<String>,
        V: fmt::Display,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            template: template.into(),
            placeholders: placeholders
                .into_iter()
                .map(|(name, value)| (name.into(), value.to_string()))
                .collect(),
        }
    }

    /// Attach a named placeholder value, returning the extended lazy string.
    ///
    /// Values are stringified immediately through `Display`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.placeholders.insert(name.into(), value.to_string());
        self
    }

    /// The untranslated template, also used as the catalog lookup key.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// All named placeholder values.
    pub fn placeholders(&self) -> &BTreeMap<String, String> {
        &self.placeholders
    }

    /// Look up a single placeholder value.
    pub fn placeholder(&self, name: &str) -> Option<&str> {
        self.placeholders.get(name).map(String::as_str)
    }

    /// Translate the template with `translate_fn`, then substitute placeholders.
    ///
    /// `translate_fn` must fall back to returning its input for unknown keys.
    pub fn resolve<F>(&self, translate_fn: &F) -> Result<String, TranslateError>
    where
        F: Fn(&str) -> String + ?Sized,
    {
        let translated = translate_fn(&self.template);
        interpolate(&translated, &self.placeholders)
    }
}

/// Mark a message for deferred translation.
///
/// # Example
/// ```
/// use api_localization::i18n::lazy_gettext;
///
/// let lazy = lazy_gettext("My name is {name}").with("name", "Edvard");
/// assert_eq!(lazy, "My name is {name}");
/// ```
pub fn lazy_gettext(template: impl Into<String>) -> LazyString {
    LazyString::new(template)
}

impl fmt::Display for LazyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl Deref for LazyString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.template
    }
}

impl AsRef<str> for LazyString {
    fn as_ref(&self) -> &str {
        &self.template
    }
}

impl Borrow<str> for LazyString {
    fn borrow(&self) -> &str {
        &self.template
    }
}

// Equality and hashing follow the template only, so `Borrow<str>` stays
// consistent with `str`'s own `Eq` and `Hash`.
impl PartialEq for LazyString {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for LazyString {}

impl Hash for LazyString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.hash(state);
    }
}

impl PartialEq<str> for LazyString {
    fn eq(&self, other: &str) -> bool {
        self.template == other
    }
}

impl PartialEq<&str> for LazyString {
    fn eq(&self, other: &&str) -> bool {
        self.template == *other
    }
}

impl PartialEq<String> for LazyString {
    fn eq(&self, other: &String) -> bool {
        &self.template == other
    }
}

impl From<&str> for LazyString {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for LazyString {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}

impl Serialize for LazyString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.template)
    }
}

/// Incoming plain strings become translatable, placeholder-free lazy strings.
impl<'de> Deserialize<'de> for LazyString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(LazyString::new)
    }
}
