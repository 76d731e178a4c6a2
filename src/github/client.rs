use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::time::Duration;

use super::{ProxyResult, RemoteApi};
use crate::config::{GithubBaseUrl, ServerConfig};
use crate::VERSION;

/// GET against the GitHub REST API, one attempt per call, no retries
pub struct GithubClient {
    base_url: GithubBaseUrl,
    client: Client,
    token: Option<SecretString>,
}

impl GithubClient {
    pub fn new(base_url: GithubBaseUrl, timeout: Duration, token: Option<SecretString>) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("failed to build http client with timeout: {}. using defaults.", e);
                Client::new()
            });

        GithubClient {
            base_url,
            client,
            token,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        let token = config
            .github_token()
            .map(|t| SecretString::from(t.expose_secret().to_string()));
        GithubClient::new(config.github_api.clone(), config.proxy_timeout, token)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        // github rejects requests without a user agent
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("funhttp/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(token) = &self.token {
            match format!("Bearer {}", token.expose_secret()).parse::<HeaderValue>() {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => log::warn!("github token is not a valid header value, sending without it"),
            }
        }

        headers
    }
}

#[async_trait]
impl RemoteApi for GithubClient {
    async fn fetch(&self, url: &str) -> ProxyResult {
        log::debug!("fetching {}", url);

        let response = match self.client.get(url).headers(self.headers()).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("exception in url request: {}", e);
                return ProxyResult::TransportFailure(e.to_string());
            }
        };

        let status = response.status().as_u16();
        if let Some(failure) = ProxyResult::failure_for(status) {
            log::warn!("{} answered {}: {}", url, status, failure);
            return failure;
        }

        match response.text().await {
            Ok(body) => ProxyResult::Ok(body),
            Err(e) => {
                log::warn!("failed to read body from {}: {}", url, e);
                ProxyResult::TransportFailure(e.to_string())
            }
        }
    }
}

impl fmt::Display for GithubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "version: {} base_url: {} authenticated: {}",
            VERSION,
            self.base_url,
            self.token.is_some()
        )
    }
}
