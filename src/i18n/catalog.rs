//! Message catalogs: gettext `.mo` lookup with identity fallback.
//!
//! Catalogs live at `{locale_dir}/{language}/LC_MESSAGES/{domain}.mo`. Loading
//! never fails the caller: a language without a usable catalog yields a
//! translator that returns every key unchanged.

use crate::config::LocalizationConfig;
use crate::i18n::language::{
    candidate_codes, is_valid_tag, parse_accept_language, primary_subtag,
};
use crate::i18n::LocalizationMetrics;
use anyhow::{Context, Result};
use gettext::Catalog;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// A translate function bound to one language's catalog.
///
/// Cheap to clone. Without a catalog it behaves as the identity function.
#[derive(Clone, Default)]
pub struct Translator {
    language: Option<String>,
    catalog: Option<Arc<Catalog>>,
    metrics: Option<Arc<LocalizationMetrics>>,
}

impl Translator {
    /// A translator that returns every key unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    fn with_catalog(language: String, catalog: Arc<Catalog>) -> Self {
        Self {
            language: Some(language),
            catalog: Some(catalog),
            metrics: None,
        }
    }

    fn with_metrics(mut self, metrics: Arc<LocalizationMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// The catalog language this translator was loaded for, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Whether this translator has no catalog behind it.
    pub fn is_identity(&self) -> bool {
        self.catalog.is_none()
    }

    /// Look up `key`, returning it unchanged when the catalog has no entry.
    pub fn gettext(&self, key: &str) -> String {
        let Some(catalog) = &self.catalog else {
            return key.to_string();
        };

        let translated = catalog.gettext(key);
        if let Some(metrics) = &self.metrics {
            // The catalog hands back the key itself when it has no entry
            if std::ptr::eq(translated, key) {
                metrics.record_catalog_miss();
            } else {
                metrics.record_catalog_hit();
            }
        }
        translated.to_string()
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("language", &self.language)
            .field("has_catalog", &self.catalog.is_some())
            .finish()
    }
}

/// Path of the `.mo` file for one language.
pub fn catalog_path(locale_dir: &Path, domain: &str, language: &str) -> PathBuf {
    locale_dir
        .join(language)
        .join("LC_MESSAGES")
        .join(format!("{domain}.mo"))
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Catalog::parse(BufReader::new(file))
        .with_context(|| format!("Failed to parse catalog {}", path.display()))
}

fn is_not_found(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

/// Load the catalog of one language directory, if it has a usable one.
fn load_language(locale_dir: &Path, domain: &str, language: &str) -> Option<Catalog> {
    let path = catalog_path(locale_dir, domain, language);
    match load_catalog(&path) {
        Ok(catalog) => {
            debug!("Loaded catalog {}", path.display());
            Some(catalog)
        }
        Err(e) if is_not_found(&e) => {
            debug!("No catalog at {}", path.display());
            None
        }
        Err(e) => {
            warn!("Ignoring unusable catalog: {:#}", e);
            None
        }
    }
}

/// Find and load the first usable catalog among the candidates for `language_code`.
fn find_catalog(locale_dir: &Path, domain: &str, language_code: &str) -> Option<(String, Catalog)> {
    if !is_valid_tag(language_code.trim()) {
        debug!("Rejecting language code {:?}", language_code);
        return None;
    }

    candidate_codes(language_code).into_iter().find_map(|candidate| {
        load_language(locale_dir, domain, &candidate).map(|catalog| (candidate, catalog))
    })
}

/// Get the translate function for a language, or the identity fallback.
///
/// Never fails: a missing or malformed language code, locale directory or
/// catalog file all produce `Translator::identity()`.
///
/// # Example
/// ```
/// use api_localization::i18n::get_gettext;
///
/// let translator = get_gettext("messages", "/nonexistent", Some("es"));
/// assert!(translator.is_identity());
/// assert_eq!(translator.gettext("Hello"), "Hello");
/// ```
pub fn get_gettext(
    domain: &str,
    locale_dir: impl AsRef<Path>,
    language_code: Option<&str>,
) -> Translator {
    language_code
        .and_then(|code| find_catalog(locale_dir.as_ref(), domain, code))
        .map(|(language, catalog)| Translator::with_catalog(language, Arc::new(catalog)))
        .unwrap_or_default()
}

/// Upper bound on remembered "no catalog" results.
const MAX_MISSING_LANGUAGES: usize = 64;

/// Per-language catalog store shared across requests.
///
/// Each catalog is read from disk at most once; later requests reuse the
/// parsed catalog. The cache is keyed by catalog directory, so it only grows
/// with what is on disk. Directories found to have no catalog are remembered
/// up to `MAX_MISSING_LANGUAGES`.
///
/// The source language is the language templates are written in. It needs no
/// catalog: requests for it get the identity translator.
pub struct Catalogs {
    domain: String,
    locale_dir: PathBuf,
    source_language: String,
    default_language: Option<String>,
    loaded: RwLock<HashMap<String, Arc<Catalog>>>,
    missing: RwLock<HashSet<String>>,
    metrics: Arc<LocalizationMetrics>,
}

impl Catalogs {
    pub fn new(domain: impl Into<String>, locale_dir: impl Into<PathBuf>) -> Self {
        Self {
            domain: domain.into(),
            locale_dir: locale_dir.into(),
            source_language: "en".to_string(),
            default_language: None,
            loaded: RwLock::new(HashMap::new()),
            missing: RwLock::new(HashSet::new()),
            metrics: Arc::new(LocalizationMetrics::new()),
        }
    }

    /// Build a store from configuration.
    pub fn from_config(config: &LocalizationConfig) -> Self {
        let catalogs = Self::new(config.domain.clone(), config.locale_dir.clone())
            .with_source_language(config.source_language.clone());
        match &config.default_language {
            Some(code) => catalogs.with_default_language(code.clone()),
            None => catalogs,
        }
    }

    /// Language the message templates are written in (defaults to "en").
    #[must_use]
    pub fn with_source_language(mut self, code: impl Into<String>) -> Self {
        self.source_language = code.into();
        self
    }

    /// Language used when a request expresses no usable preference.
    #[must_use]
    pub fn with_default_language(mut self, code: impl Into<String>) -> Self {
        self.default_language = Some(code.into());
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn locale_dir(&self) -> &Path {
        &self.locale_dir
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn default_language(&self) -> Option<&str> {
        self.default_language.as_deref()
    }

    /// Whether `code` names the language templates are written in.
    pub fn is_source_language(&self, code: &str) -> bool {
        primary_subtag(code).eq_ignore_ascii_case(primary_subtag(&self.source_language))
    }

    pub fn metrics(&self) -> &LocalizationMetrics {
        &self.metrics
    }

    /// Get the translator for `language_code`, loading its catalog on first use.
    ///
    /// Falls back to the identity translator when the language has no catalog
    /// or the code is not a language tag.
    pub fn translator(&self, language_code: Option<&str>) -> Translator {
        let Some(code) = language_code.map(str::trim).filter(|c| !c.is_empty()) else {
            return Translator::identity();
        };
        if !is_valid_tag(code) {
            debug!("Rejecting language code {:?}", code);
            return Translator::identity();
        }

        match self.lookup(code) {
            Some((language, catalog)) => {
                Translator::with_catalog(language, catalog).with_metrics(Arc::clone(&self.metrics))
            }
            None => {
                if !self.is_source_language(code) {
                    self.metrics.record_missing_catalog();
                }
                Translator::identity()
            }
        }
    }

    /// Pick the client's most preferred language that can be served.
    ///
    /// A language can be served if it has a catalog or is the source
    /// language. Falls back to the default language.
    pub fn negotiate_language(&self, accept_language: &str) -> Option<String> {
        parse_accept_language(accept_language)
            .into_iter()
            .map(|range| range.tag)
            .find(|tag| self.is_source_language(tag) || self.has_language(tag))
            .or_else(|| self.default_language.clone())
    }

    /// Whether `language_code` resolves to a catalog.
    pub fn has_language(&self, language_code: &str) -> bool {
        self.lookup(language_code.trim()).is_some()
    }

    /// Load catalogs for every language directory present under the locale dir.
    ///
    /// Returns the languages that loaded successfully.
    pub fn preload(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.locale_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Cannot read locale directory {}: {}",
                    self.locale_dir.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut languages: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|language| self.lookup(language).is_some())
            .collect();
        languages.sort();

        info!(
            "Loaded {} catalog(s) for domain '{}': {:?}",
            languages.len(),
            self.domain,
            languages
        );
        languages
    }

    fn lookup(&self, code: &str) -> Option<(String, Arc<Catalog>)> {
        if !is_valid_tag(code) {
            return None;
        }

        for candidate in candidate_codes(code) {
            if let Some(catalog) = self
                .loaded
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&candidate)
            {
                return Some((candidate, Arc::clone(catalog)));
            }

            if self
                .missing
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(&candidate)
            {
                continue;
            }

            match load_language(&self.locale_dir, &self.domain, &candidate) {
                Some(catalog) => {
                    let catalog = Arc::clone(
                        self.loaded
                            .write()
                            .unwrap_or_else(PoisonError::into_inner)
                            .entry(candidate.clone())
                            .or_insert_with(|| Arc::new(catalog)),
                    );
                    return Some((candidate, catalog));
                }
                None => {
                    let mut missing = self.missing.write().unwrap_or_else(PoisonError::into_inner);
                    if missing.len() < MAX_MISSING_LANGUAGES {
                        missing.insert(candidate);
                    }
                }
            }
        }
        None
    }
}

impl fmt::Debug for Catalogs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalogs")
            .field("domain", &self.domain)
            .field("locale_dir", &self.locale_dir)
            .field("source_language", &self.source_language)
            .field("default_language", &self.default_language)
            .finish_non_exhaustive()
    }
}
