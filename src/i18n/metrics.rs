//! Localization metrics and observability.
//!
//! Tracks how catalog lookups behave at runtime: how often a key is found,
//! how often it falls back to the untranslated text, how many requests asked
//! for a language with no catalog, and how many payloads failed to resolve.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by a `Catalogs` store and every translator it hands out.
#[derive(Debug, Default)]
pub struct LocalizationMetrics {
    /// Number of lookups answered by a catalog entry
    catalog_hits: AtomicUsize,

    /// Number of lookups that fell back to the key itself
    catalog_misses: AtomicUsize,

    /// Number of translator requests for a language with no catalog
    missing_catalogs: AtomicUsize,

    /// Number of payloads that failed to resolve
    translation_failures: AtomicUsize,
}

impl LocalizationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup answered by the catalog.
    pub fn record_catalog_hit(&self) {
        self.catalog_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that fell back to the untranslated key.
    pub fn record_catalog_miss(&self) {
        self.catalog_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request for a language with no catalog.
    pub fn record_missing_catalog(&self) {
        self.missing_catalogs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a payload that could not be resolved.
    pub fn record_translation_failure(&self) {
        self.translation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn catalog_hits(&self) -> usize {
        self.catalog_hits.load(Ordering::Relaxed)
    }

    pub fn catalog_misses(&self) -> usize {
        self.catalog_misses.load(Ordering::Relaxed)
    }

    pub fn missing_catalogs(&self) -> usize {
        self.missing_catalogs.load(Ordering::Relaxed)
    }

    pub fn translation_failures(&self) -> usize {
        self.translation_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.catalog_hits();
        let misses = self.catalog_misses();
        let total_lookups = hits + misses;
        let catalog_hit_rate = if total_lookups > 0 {
            (hits as f64 / total_lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            catalog_hits: hits,
            catalog_misses: misses,
            catalog_hit_rate,
            missing_catalogs: self.missing_catalogs(),
            translation_failures: self.translation_failures(),
        }
    }
}

/// Snapshot of localization statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub catalog_hits: usize,
    pub catalog_misses: usize,

    /// Catalog hit rate as a percentage (0-100)
    pub catalog_hit_rate: f64,

    pub missing_catalogs: usize,
    pub translation_failures: usize,
}
