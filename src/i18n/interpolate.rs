//! Named placeholder substitution for translated templates.
//!
//! Templates use `{name}` fields. `{{` and `}}` produce literal braces.

use crate::i18n::TranslateError;
use std::collections::BTreeMap;

/// Replace every `{name}` field in `template` with its value.
///
/// Fails when a field names a value that was not supplied, or when a brace
/// is left unbalanced.
pub fn interpolate(
    template: &str,
    placeholders: &BTreeMap<String, String>,
) -> Result<String, TranslateError> {
    // Fast path: nothing to substitute or unescape
    if !template.contains(['{', '}']) {
        return Ok(template.to_string());
    }

    let mut output = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    output.push('{');
                    continue;
                }

                let start = position + 1;
                let end = loop {
                    match chars.next() {
                        Some((i, '}')) => break i,
                        Some((_, '{')) | None => {
                            return Err(TranslateError::MalformedTemplate {
                                template: template.to_string(),
                                position,
                            })
                        }
                        Some(_) => {}
                    }
                };

                let name = &template[start..end];
                let value = placeholders.get(name).ok_or_else(|| {
                    TranslateError::MissingPlaceholder {
                        name: name.to_string(),
                        template: template.to_string(),
                    }
                })?;
                output.push_str(value);
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(TranslateError::MalformedTemplate {
                        template: template.to_string(),
                        position,
                    });
                }
                output.push('}');
            }
            other => output.push(other),
        }
    }

    Ok(output)
}
