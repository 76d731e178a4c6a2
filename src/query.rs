//! query string decoding
//!
//! turns `a=1&b=hello+world` into an ordered key/value mapping. two policies
//! exist: strict rejects the whole query on the first bad pair, lenient drops
//! bad pairs and keeps going.

use std::fmt;

/// how malformed pairs are treated while decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// a pair without `=` or with a broken escape aborts the whole query
    Strict,
    /// pairs without `=`, with an empty value, or with a broken escape are skipped
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// a pair had no `=` in it
    MissingSeparator(String),
    /// a `%` escape was malformed or the bytes were not utf-8
    Encoding(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::MissingSeparator(pair) => write!(f, "missing '=' in pair '{}'", pair),
            QueryError::Encoding(part) => write!(f, "invalid percent-encoding in '{}'", part),
        }
    }
}

impl std::error::Error for QueryError {}

/// ordered key/value pairs, keys are unique and the last write wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    pairs: Vec<(String, String)>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// insert a pair, replacing the value in place if the key already exists
    pub fn insert(&mut self, key: String, value: String) {
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// value for `key` only when present and not blank
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for QueryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

/// decode a raw query string (the part after `?`) under the given policy
pub fn decode(query: &str, mode: DecodeMode) -> Result<QueryParameters, QueryError> {
    let mut params = QueryParameters::new();

    // trailing separators carry no pairs
    let query = query.trim_end_matches('&');
    if query.is_empty() {
        return Ok(params);
    }

    for pair in query.split('&') {
        let (raw_key, raw_value) = match pair.split_once('=') {
            Some(parts) => parts,
            None => match mode {
                DecodeMode::Strict => return Err(QueryError::MissingSeparator(pair.to_string())),
                DecodeMode::Lenient => continue,
            },
        };

        if mode == DecodeMode::Lenient && raw_value.is_empty() {
            continue;
        }

        let decoded = decode_component(raw_key).and_then(|k| Ok((k, decode_component(raw_value)?)));
        match decoded {
            Ok((key, value)) => params.insert(key, value),
            Err(e) => match mode {
                DecodeMode::Strict => return Err(e),
                DecodeMode::Lenient => {
                    log::debug!("skipping undecodable pair '{}': {}", pair, e);
                }
            },
        }
    }

    Ok(params)
}

/// percent-decode one key or value, `+` is a space
fn decode_component(raw: &str) -> Result<String, QueryError> {
    if !has_valid_escapes(raw) {
        return Err(QueryError::Encoding(raw.to_string()));
    }

    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|cow| cow.into_owned())
        .map_err(|_| QueryError::Encoding(raw.to_string()))
}

/// every `%` must be followed by two hex digits
fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3);
            match hex {
                Some([a, b]) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}
