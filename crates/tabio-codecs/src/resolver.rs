//! File-type inference.
//!
//! A name matches every known token it ends with (case-insensitively). When
//! several tokens match, the longest one wins, so a compound extension such
//! as `s.csv` takes precedence over `csv`.

use std::path::Path;

use crate::error::{Action, CodecError, Result};

/// Find the longest token that `name` ends with
pub fn longest_suffix_match<'a>(
    name: &str,
    tokens: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let name = name.to_lowercase();
    tokens
        .into_iter()
        .filter(|token| !token.is_empty() && name.ends_with(&token.to_lowercase()))
        .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
}

/// Infer the token for `name` among `tokens`
///
/// Fails with [`CodecError::UnsupportedFileType`] naming the trailing dot
/// segment of `name` when no token matches.
pub fn infer_type<'a>(
    name: &str,
    action: Action,
    tokens: impl IntoIterator<Item = &'a str>,
) -> Result<String> {
    match longest_suffix_match(name, tokens) {
        Some(token) => Ok(token.to_lowercase()),
        None => Err(CodecError::UnsupportedFileType {
            extension: trailing_extension(name).to_string(),
            action,
        }),
    }
}

/// Validate an explicit type hint against `tokens`
pub fn check_type<'a>(
    hint: &str,
    action: Action,
    tokens: impl IntoIterator<Item = &'a str>,
) -> Result<String> {
    let hint = hint.trim_start_matches('.').to_lowercase();
    if tokens.into_iter().any(|token| token.eq_ignore_ascii_case(&hint)) {
        Ok(hint)
    } else {
        Err(CodecError::UnsupportedFileType {
            extension: hint,
            action,
        })
    }
}

/// The text after the last dot of the final path component
pub fn trailing_extension(name: &str) -> &str {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);
    file_name.rsplit('.').next().unwrap_or(file_name)
}
