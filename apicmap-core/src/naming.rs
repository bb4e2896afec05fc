//! APIC name synthesis.
//!
//! APIC object names are limited to [`MAX_NAME_LENGTH`] characters. Every
//! mapped name goes through [`synthesize`], which picks between the canonical
//! resource name and the resource id according to a [`NamingStrategy`] and
//! enforces the limit with [`truncate`].
//!
//! Lengths are counted in characters, not bytes, and truncation never splits
//! a multi-byte character.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::NamingStrategy;

/// Maximum length (in characters) of a name accepted by APIC.
pub const MAX_NAME_LENGTH: usize = 46;

/// Separator placed between a truncated canonical name and the resource id.
pub const ID_SUFFIX_SEPARATOR: char = '_';

static HYPHEN_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-{2,}").expect("Invalid hyphen run regex"));

/// Return the first `max_length` characters of `value`.
///
/// `value` is returned untouched when it already fits, and a negative
/// `max_length` yields the empty string.
pub fn truncate(value: &str, max_length: i64) -> &str {
    if max_length < 0 {
        return "";
    }
    let max_length = usize::try_from(max_length).unwrap_or(usize::MAX);
    match value.char_indices().nth(max_length) {
        Some((cut, _)) => &value[..cut],
        None => value,
    }
}

/// Collapse every run of consecutive hyphens into a single hyphen.
pub fn collapse_hyphens(value: &str) -> Cow<'_, str> {
    HYPHEN_RUN.replace_all(value, "-")
}

/// Number of characters left for the canonical name once the id suffix
/// (`_<normalized id>`) is reserved. Negative when the suffix alone is over
/// the limit.
pub fn canonical_budget(resource_id: &str) -> i64 {
    let suffix_len = collapse_hyphens(resource_id).chars().count() + 1;
    MAX_NAME_LENGTH as i64 - suffix_len as i64
}

/// Compute the APIC name for a resource.
///
/// An empty canonical name is treated the same as a missing one.
pub fn synthesize(canonical: Option<&str>, resource_id: &str, strategy: NamingStrategy) -> String {
    let normalized_id = collapse_hyphens(resource_id);
    let canonical = canonical
        .filter(|name| !name.is_empty())
        .map(collapse_hyphens);

    let result = match (canonical, strategy) {
        (Some(name), NamingStrategy::UseName) => name.into_owned(),
        (Some(name), NamingStrategy::UseUuid) => {
            let budget = canonical_budget(&normalized_id);
            let mut result = String::with_capacity(MAX_NAME_LENGTH);
            result.push_str(truncate(&name, budget));
            result.push(ID_SUFFIX_SEPARATOR);
            result.push_str(&normalized_id);
            result
        }
        (None, _) => normalized_id.into_owned(),
    };

    truncate(&result, MAX_NAME_LENGTH as i64).to_string()
}
