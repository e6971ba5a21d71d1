//! HTTP headers sent with every JSON-RPC exchange
//!
//! A [`HeaderSet`] is assembled once, when the client is built, from the base
//! defaults plus the caller's extra headers. It is never edited in place:
//! setting credentials or replacing headers produces a new set that the client
//! swaps in whole.
//!
//! Header names compare case-insensitively, and a later header replaces an
//! earlier one with the same name while keeping its position. Caller-supplied
//! names and values are checked against HTTP syntax when they are merged, so
//! a malformed header fails at construction rather than on every call.

use base64::{engine::general_purpose::STANDARD, Engine};
use jroh_core::{Error, Result};
use reqwest::header::{HeaderName, HeaderValue};

/// Value of the `User-Agent` header
pub const USER_AGENT: &str = concat!("jroh/", env!("CARGO_PKG_VERSION"));

/// Ordered, case-insensitive list of header name/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// The headers every request carries
    pub fn defaults() -> Self {
        let mut set = Self::new();
        set.insert("User-Agent", USER_AGENT);
        set.insert("Content-Type", "application/json");
        set.insert("Accept", "application/json");
        set.insert("Connection", "close");
        set
    }

    /// Defaults overlaid with caller-supplied headers
    pub fn assemble<K, V>(extra: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::defaults().merged(extra)
    }

    /// New set with `extra` applied on top of this one
    ///
    /// Fails on the first name or value that is not a valid HTTP header.
    pub fn merged<K, V>(&self, extra: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = self.clone();
        for (name, value) in extra {
            let (name, value) = (name.into(), value.into());
            validate(&name, &value)?;
            set.insert(name, value);
        }
        Ok(set)
    }

    /// New set carrying an `Authorization: Basic` header for the credentials
    pub fn with_basic_auth(&self, username: &str, password: &str) -> Self {
        // base64 output is always a valid header value
        let mut set = self.clone();
        set.insert("Authorization", basic_auth_value(username, password));
        set
    }

    /// New set without the named header
    pub fn without(&self, name: &str) -> Self {
        let mut set = self.clone();
        set.entries.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        set
    }

    /// Value of a header, looked up case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }
}

fn validate(name: &str, value: &str) -> Result<()> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::Internal(format!("Invalid header name {:?}: {}", name, e)))?;
    HeaderValue::from_str(value)
        .map_err(|e| Error::Internal(format!("Invalid value for header {:?}: {}", name, e)))?;
    Ok(())
}

/// `Basic <base64(username:password)>`
pub fn basic_auth_value(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let headers = HeaderSet::defaults();
        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("Accept"), Some("application/json"));
        assert_eq!(headers.get("Connection"), Some("close"));
        assert!(headers.get("User-Agent").unwrap().starts_with("jroh/"));
        assert!(!headers.contains("Authorization"));
    }

    #[test]
    fn test_extra_headers_override_case_insensitively() {
        let headers = HeaderSet::assemble([("X-Api-Key", "k"), ("accept", "text/plain")]).unwrap();
        assert_eq!(headers.get("x-api-key"), Some("k"));
        assert_eq!(headers.get("Accept"), Some("text/plain"));
        assert_eq!(headers.len(), 5);
    }

    #[test]
    fn test_merge_does_not_mutate_original() {
        let base = HeaderSet::defaults();
        let merged = base.merged([("X-Trace", "1")]).unwrap();
        assert!(!base.contains("X-Trace"));
        assert!(merged.contains("X-Trace"));
    }

    #[test]
    fn test_basic_auth() {
        assert_eq!(basic_auth_value("Aladdin", "open sesame"), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");

        let headers = HeaderSet::defaults().with_basic_auth("user", "pass");
        assert_eq!(headers.get("authorization"), Some("Basic dXNlcjpwYXNz"));

        let cleared = headers.without("AUTHORIZATION");
        assert!(!cleared.contains("Authorization"));
    }

    #[test]
    fn test_invalid_headers_rejected() {
        let error = HeaderSet::assemble([("X-Bad", "line\nbreak")]).unwrap_err();
        assert_eq!(error.kind(), jroh_core::ErrorKind::Internal);
        assert!(error.to_string().contains("X-Bad"));

        let error = HeaderSet::assemble([("Bad Name", "v")]).unwrap_err();
        assert!(error.to_string().contains("Bad Name"));

        let base = HeaderSet::defaults();
        assert!(base.merged([("X-Ok", "1"), ("X:Nope", "2")]).is_err());
        assert!(!base.contains("X-Ok"));
    }
}
