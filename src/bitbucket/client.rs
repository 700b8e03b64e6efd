//! Bitbucket API client.

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::error::{Error, Result};

/// A Bitbucket login and the secret that goes with it.
///
/// For accounts with two-factor auth the secret is an app password, not the
/// account password.
#[derive(Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Create credentials from the BITBUCKET_LOGIN and BITBUCKET_PASSWORD
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        let login = std::env::var("BITBUCKET_LOGIN")
            .map_err(|_| Error::MissingCredentials("BITBUCKET_LOGIN is not set".into()))?;
        let password = std::env::var("BITBUCKET_PASSWORD")
            .map_err(|_| Error::MissingCredentials("BITBUCKET_PASSWORD is not set".into()))?;
        Ok(Self::new(login, password))
    }
}

/// Client for the Bitbucket Cloud 2.0 REST API.
#[derive(Clone)]
pub struct BitbucketClient {
    pub(crate) base_url: String,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) client: Client,
}

impl BitbucketClient {
    /// Create an anonymous client. Only public repositories are visible.
    pub fn new() -> Self {
        Self {
            base_url: "https://api.bitbucket.org".into(),
            credentials: None,
            client: Client::new(),
        }
    }

    /// Create a client that authenticates every request.
    ///
    /// Credentials are attached preemptively as HTTP Basic auth, so private
    /// listings succeed on the first round trip instead of being challenged
    /// and retried.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            base_url: "https://api.bitbucket.org".into(),
            credentials: Some(credentials),
            client: Client::new(),
        }
    }

    /// Point the client at a different API host (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        // Remove trailing slash if present
        if url.ends_with('/') {
            url.pop();
        }
        self.base_url = url;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request against the API and decode the JSON response.
    ///
    /// `url` is either a path below the base URL or an absolute URL, which
    /// the pagination cursor hands back verbatim.
    pub(crate) fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url)
        };
        debug!("GET {url}");

        let mut request = self
            .client
            .get(&url)
            .header(USER_AGENT, "bucket-clone");
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.login, Some(&credentials.password));
        }
        let response = request.send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for BitbucketClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = BitbucketClient::new().with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_anonymous_client_has_no_credentials() {
        assert!(BitbucketClient::new().credentials.is_none());
    }

    #[test]
    fn test_credentials_from_env_requires_both_variables() {
        unsafe {
            std::env::remove_var("BITBUCKET_LOGIN");
            std::env::remove_var("BITBUCKET_PASSWORD");
        }
        assert!(matches!(
            Credentials::from_env(),
            Err(Error::MissingCredentials(_))
        ));
    }
}
