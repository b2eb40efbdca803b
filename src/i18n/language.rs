//! Language codes: normalization and `Accept-Language` negotiation.
//!
//! Catalog directories follow gettext naming (`es`, `pt_BR`), while HTTP
//! clients send BCP 47 tags (`pt-BR`, `es-419`). This module maps one onto the
//! other and orders a client's preferences.

/// A single language preference parsed from an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    /// Language tag as sent by the client (e.g., "pt-BR")
    pub tag: String,

    /// Quality weight in the range (0, 1]
    pub quality: f32,
}

/// Parse an `Accept-Language` header into preferences, best first.
///
/// Wildcards, zero-quality entries and malformed entries are dropped. Entries
/// of equal quality keep the order the client sent them in.
///
/// # Example
/// ```
/// use api_localization::i18n::parse_accept_language;
///
/// let ranges = parse_accept_language("fr;q=0.5, es-MX, en;q=0.8");
/// let tags: Vec<_> = ranges.iter().map(|r| r.tag.as_str()).collect();
/// assert_eq!(tags, vec!["es-MX", "en", "fr"]);
/// ```
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
    let mut ranges: Vec<LanguageRange> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" || !is_valid_tag(tag) {
                return None;
            }

            let mut quality = 1.0_f32;
            for param in parts {
                let (key, value) = param.split_once('=')?;
                if key.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse().ok()?;
                }
            }

            if !(quality > 0.0 && quality <= 1.0) {
                return None;
            }

            Some(LanguageRange {
                tag: tag.to_string(),
                quality,
            })
        })
        .collect();

    // sort_by is stable, so ties keep header order
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}

/// Longest language tag accepted from a client.
const MAX_TAG_LEN: usize = 35;

/// Whether `tag` looks like a language tag: alphanumeric subtags of at most
/// eight characters separated by `-` or `_`.
///
/// Anything else (paths, dots, empty subtags) must never reach the filesystem.
pub(crate) fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag.len() <= MAX_TAG_LEN
        && tag.split(['-', '_']).all(|subtag| {
            !subtag.is_empty()
                && subtag.len() <= 8
                && subtag.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

/// Convert a BCP 47 tag into gettext's `ll_CC` form.
///
/// The language subtag is lowercased and a two-letter region is uppercased;
/// other subtags are kept as sent.
///
/// # Example
/// ```
/// use api_localization::i18n::normalize_language_code;
///
/// assert_eq!(normalize_language_code("PT-br"), "pt_BR");
/// assert_eq!(normalize_language_code("es"), "es");
/// ```
pub fn normalize_language_code(code: &str) -> String {
    let mut subtags = code.trim().split(['-', '_']);
    let mut normalized = subtags.next().unwrap_or_default().to_ascii_lowercase();

    for subtag in subtags {
        normalized.push('_');
        if subtag.len() == 2 {
            normalized.push_str(&subtag.to_ascii_uppercase());
        } else {
            normalized.push_str(subtag);
        }
    }

    normalized
}

/// The primary language subtag (e.g., "pt" for "pt-BR").
pub fn primary_subtag(code: &str) -> &str {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
}

/// Catalog directory names to try for `code`, most specific first.
///
/// Mirrors gettext's expansion: the exact code, its normalized form, then the
/// bare language.
pub fn candidate_codes(code: &str) -> Vec<String> {
    let code = code.trim();
    if code.is_empty() {
        return Vec::new();
    }

    let mut candidates = vec![code.to_string()];
    for candidate in [
        normalize_language_code(code),
        primary_subtag(code).to_ascii_lowercase(),
    ] {
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}
