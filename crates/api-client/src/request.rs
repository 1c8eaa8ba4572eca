//! Outgoing request configuration and URL helpers

use reqwest::Method;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// Header name to value mapping
pub type Headers = BTreeMap<String, String>;

/// Query parameter mapping
pub type Params = Map<String, Value>;

/// Configuration for one outgoing request
///
/// Built fresh for every call and handed through the request interceptors
/// before it is turned into a `reqwest` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestConfig {
    /// HTTP verb
    #[serde(serialize_with = "serialize_method")]
    pub method: Option<Method>,
    /// Base URL the path is resolved against
    pub base_url: Option<String>,
    /// Path (or absolute URL)
    pub url: Option<String>,
    /// Request headers
    pub headers: Headers,
    /// Query parameters
    pub params: Option<Params>,
    /// JSON body
    pub data: Option<Value>,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

fn serialize_method<S: Serializer>(method: &Option<Method>, serializer: S) -> Result<S::Ok, S::Error> {
    match method {
        Some(m) => serializer.serialize_some(m.as_str()),
        None => serializer.serialize_none(),
    }
}

impl RequestConfig {
    /// Builder-style method to set the verb
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Builder-style method to set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builder-style method to set the path
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder-style method to set query parameters
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Builder-style method to set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Uppercased verb, or `UNKNOWN`
    #[must_use]
    pub fn display_method(&self) -> String {
        self.method
            .as_ref()
            .map_or_else(|| "UNKNOWN".to_string(), |m| m.as_str().to_uppercase())
    }

    /// `base_url + url` as written, or `No URL`
    #[must_use]
    pub fn display_url(&self) -> String {
        match &self.url {
            Some(url) => format!("{}{url}", self.base_url.as_deref().unwrap_or_default()),
            None => "No URL".to_string(),
        }
    }

    /// The URL the request is actually sent to
    #[must_use]
    pub fn full_url(&self) -> String {
        let url = self.url.as_deref().unwrap_or_default();
        match self.base_url.as_deref() {
            Some(base) if !is_absolute_url(url) => combine_urls(base, url),
            _ => url.to_string(),
        }
    }

    /// Query parameters as string pairs, skipping nulls
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .flatten()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key.clone(), s.clone())),
                other => Some((key.clone(), other.to_string())),
            })
            .collect()
    }
}

/// Insert a header, replacing any entry whose name differs only in case
///
/// The new name is kept as written.
pub fn insert_header(headers: &mut Headers, name: impl Into<String>, value: impl Into<String>) {
    let name = name.into();
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value.into());
}

/// Merge `overrides` over `base`; header names compare case-insensitively
pub fn merge_headers(base: &mut Headers, overrides: &Headers) {
    for (name, value) in overrides {
        insert_header(base, name.clone(), value.clone());
    }
}

/// Prefix `http://` unless the host already names a scheme
#[must_use]
pub fn ensure_protocol(host: &str) -> String {
    let lower = host.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

/// Join a base URL and a relative path with exactly one slash
#[must_use]
pub fn combine_urls(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Whether `url` starts with a scheme (`scheme://`) or is protocol-relative
#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    match url.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
