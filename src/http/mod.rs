pub mod middleware;

use std::collections::HashMap;

use reqwest::Client;

/// Builder for the underlying `reqwest::Client` used by the probe.
///
/// Carries the default headers every request should send; query strings are
/// built per-request by the API client, not here.
#[derive(Clone)]
pub struct Http {
    headers: Option<HashMap<String, String>>,
}

impl Http {
    pub fn new() -> Self {
        Self { headers: None }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let map = self.headers.get_or_insert_with(HashMap::new);
        map.insert(key.into(), value.into());
        self
    }

    pub fn build_client(&self) -> Client {
        let mut headers = reqwest::header::HeaderMap::new();

        if let Some(header_map) = &self.headers {
            for (key, value) in header_map {
                if let (Ok(name), Ok(val)) = (
                    reqwest::header::HeaderName::from_bytes(key.as_bytes()),
                    reqwest::header::HeaderValue::from_str(value),
                ) {
                    headers.insert(name, val);
                }
            }
        }

        Client::builder()
            .default_headers(headers)
            // Keep connections to the remote service warm across the suite:
            // every check talks to the same origin.
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(std::time::Duration::from_secs(90)))
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .tcp_keepalive(Some(std::time::Duration::from_secs(60)))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}

impl Default for Http {
    fn default() -> Self {
        Self::new()
    }
}
