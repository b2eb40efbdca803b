use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalizationConfig {
    // Catalogs
    pub domain: String,
    pub locale_dir: PathBuf,
    pub source_language: String,
    pub default_language: Option<String>,

    // Server
    pub port: u16,
}

impl LocalizationConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Catalogs - {LOCALE_DIR}/{lang}/LC_MESSAGES/{LOCALE_DOMAIN}.mo
            domain: std::env::var("LOCALE_DOMAIN").unwrap_or_else(|_| "messages".to_string()),
            locale_dir: std::env::var("LOCALE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("locales")),
            source_language: std::env::var("SOURCE_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            default_language: std::env::var("DEFAULT_LANGUAGE")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),

            // Server
            port: match std::env::var("PORT") {
                Ok(v) => v.parse().with_context(|| format!("Invalid PORT: {}", v))?,
                Err(_) => 8080,
            },
        })
    }
}
