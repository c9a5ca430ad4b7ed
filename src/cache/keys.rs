//! Cache key derivation.
//!
//! A key is a SHA-256 fingerprint of the request path, its normalized query
//! string and any extra identifiers the caller supplies. Profiles prepend a
//! readable prefix (and the entity id for detail lookups).

use std::collections::BTreeMap;
use std::fmt;

use sha2::{Digest, Sha256};
use url::form_urlencoded;

/// Separator between the parts fed to the hash.
const PART_DELIMITER: &str = "|";

/// Fingerprint identifying one logical read query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Wraps an already-derived key string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extra arguments of the wrapped read operation.
///
/// Keyword arguments live in a `BTreeMap`, so they are always rendered in
/// lexicographic key order regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyArgs {
    positional: Vec<String>,
    keyword: BTreeMap<String, String>,
}

impl KeyArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.positional.push(value.to_string());
        self
    }

    /// Sets a keyword argument, replacing any previous value for `name`.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.keyword.insert(name.into(), value.to_string());
        self
    }

    fn parts(&self) -> impl Iterator<Item = String> + '_ {
        self.positional.iter().cloned().chain(
            self.keyword
                .iter()
                .map(|(name, value)| format!("{name}={value}")),
        )
    }
}

/// Re-encodes a query string with its pairs sorted by name, then value.
///
/// `b=2&a=1` and `a=1&b=2` normalize to the same string, and so do
/// `q=a%20b` and `q=a+b`. Empty segments (`a=1&&b=2`) are dropped.
pub fn normalize_query(query: &str) -> String {
    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    pairs.sort();

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Derives the hex SHA-256 fingerprint of a read query.
///
/// The hashed string is `path?normalized_query`, followed by the positional
/// arguments and then the sorted `name=value` keyword arguments, all joined
/// with `|`. The output is always 64 hex characters.
pub fn derive_key(path: &str, query: Option<&str>, args: &KeyArgs) -> String {
    let url_part = format!("{}?{}", path, normalize_query(query.unwrap_or("")));

    let key_string = std::iter::once(url_part)
        .chain(args.parts())
        .collect::<Vec<_>>()
        .join(PART_DELIMITER);

    let mut hasher = Sha256::new();
    hasher.update(key_string.as_bytes());
    hex::encode(hasher.finalize())
}
