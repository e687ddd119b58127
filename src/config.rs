use std::collections::HashMap;
use std::time::Duration;

use reqwest::Url;

use crate::error::{RkvError, RkvResult};
use crate::retry::RetryPolicy;

pub const ENDPOINT_ADDRESS: &str = "endpoint_address";
pub const REQUEST_TIMEOUT_MS: &str = "rkv.request_timeout_ms";

const DEFAULT_ENDPOINT: &str = "localhost:8090";

/// String property bag handed to database factories by the harness.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses property-file text. The key ends at the first `=`, `:` or
    /// whitespace; `key = value`, `key: value` and `key value` are all
    /// accepted. Blank lines and lines starting with `#` or `!` are skipped.
    pub fn parse(text: &str) -> Self {
        let mut props = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let key_end = line.find(|c: char| c == '=' || c == ':' || c.is_whitespace());
            let (key, rest) = match key_end {
                Some(idx) => (&line[..idx], line[idx..].trim_start()),
                None => (line, ""),
            };
            let value = rest.strip_prefix(['=', ':']).unwrap_or(rest).trim();
            props.set(key, value);
        }
        props
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (key, value) in iter {
            props.set(key, value);
        }
        props
    }
}

/// Address of the remote store, fixed once the adapter is built.
#[derive(Debug, Clone)]
pub struct Endpoint {
    address: String,
    kv_url: Url,
}

impl Endpoint {
    pub fn new(address: &str) -> RkvResult<Self> {
        let address = address.trim();
        if address.is_empty() {
            return Err(RkvError::Config {
                message: format!("{ENDPOINT_ADDRESS} must not be empty"),
            });
        }
        let kv_url = Url::parse(&format!("http://{address}/kv")).map_err(|e| RkvError::Config {
            message: format!("invalid {ENDPOINT_ADDRESS} {address:?}: {e}"),
        })?;
        Ok(Self {
            address: address.to_string(),
            kv_url,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// `http://{address}/kv`
    pub fn kv_url(&self) -> Url {
        self.kv_url.clone()
    }

    /// `http://{address}/kv?key={key}`
    pub fn key_url(&self, key: &str) -> Url {
        let mut url = self.kv_url.clone();
        url.query_pairs_mut().append_pair("key", key);
        url
    }
}

#[derive(Debug, Clone)]
pub struct RkvConfig {
    pub endpoint: Endpoint,
    pub request_timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl RkvConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            request_timeout: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_properties(props: &Properties) -> RkvResult<Self> {
        let endpoint = Endpoint::new(props.get_or(ENDPOINT_ADDRESS, DEFAULT_ENDPOINT))?;

        let request_timeout = match props.get(REQUEST_TIMEOUT_MS) {
            Some(raw) => {
                let millis: u64 = raw.trim().parse().map_err(|e| RkvError::Config {
                    message: format!("invalid {REQUEST_TIMEOUT_MS} {raw:?}: {e}"),
                })?;
                Some(Duration::from_millis(millis))
            }
            None => None,
        };

        Ok(Self {
            request_timeout,
            ..Self::new(endpoint)
        })
    }
}
