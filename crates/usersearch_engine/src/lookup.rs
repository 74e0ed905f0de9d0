use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Url;
use usersearch_core::UserSummary;
use usersearch_logging::search_debug;

use crate::{parse_users, FailureKind, LookupError};

#[derive(Debug, Clone)]
pub struct LookupSettings {
    /// Search endpoint; the query text is appended as a single query parameter.
    pub endpoint: String,
    pub query_param: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/users/search".to_string(),
            query_param: "q".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            redirect_limit: 5,
            max_bytes: 1024 * 1024,
        }
    }
}

/// The search backend the coordinator talks to.
///
/// Implementations must tolerate concurrent calls and must not retry on their
/// own initiative beyond what their transport does.
#[async_trait::async_trait]
pub trait UserLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<UserSummary>, LookupError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUserLookup {
    endpoint: Url,
    query_param: String,
    max_bytes: u64,
    client: reqwest::Client,
}

impl ReqwestUserLookup {
    pub fn new(settings: LookupSettings) -> Result<Self, LookupError> {
        let endpoint = Url::parse(&settings.endpoint)
            .map_err(|err| LookupError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        if settings.query_param.is_empty() {
            return Err(LookupError::new(
                FailureKind::InvalidEndpoint,
                "query parameter name is empty",
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| LookupError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            endpoint,
            query_param: settings.query_param,
            max_bytes: settings.max_bytes,
            client,
        })
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(&self.query_param, query);
        url
    }
}

#[async_trait::async_trait]
impl UserLookup for ReqwestUserLookup {
    async fn lookup(&self, query: &str) -> Result<Vec<UserSummary>, LookupError> {
        let url = self.request_url(query);
        search_debug!("lookup GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(LookupError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(LookupError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }

        parse_users(&body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        return LookupError::new(FailureKind::Timeout, err.to_string());
    }
    LookupError::new(FailureKind::Network, err.to_string())
}

/// In-memory directory filtered by case-insensitive substring on name or handle.
#[derive(Debug, Clone, Default)]
pub struct LocalUserLookup {
    users: Vec<UserSummary>,
}

impl LocalUserLookup {
    pub fn new(users: Vec<UserSummary>) -> Self {
        Self { users }
    }

    pub fn filter(&self, query: &str) -> Vec<UserSummary> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.users.clone();
        }
        self.users
            .iter()
            .filter(|user| {
                user.name.to_lowercase().contains(&needle)
                    || user
                        .handle
                        .as_deref()
                        .is_some_and(|handle| handle.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl UserLookup for LocalUserLookup {
    async fn lookup(&self, query: &str) -> Result<Vec<UserSummary>, LookupError> {
        Ok(self.filter(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> LocalUserLookup {
        LocalUserLookup::new(vec![
            UserSummary::new("Ada Lovelace").with_handle("countess"),
            UserSummary::new("Alan Turing"),
            UserSummary::new("Grace Hopper").with_handle("amazing_grace"),
        ])
    }

    #[test]
    fn local_filter_matches_name_or_handle_ignoring_case() {
        let names: Vec<_> = directory()
            .filter("GRACE")
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Grace Hopper"]);

        let names: Vec<_> = directory()
            .filter("count")
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Ada Lovelace"]);
    }

    #[test]
    fn local_filter_blank_query_returns_everyone() {
        assert_eq!(directory().filter("  ").len(), 3);
        assert!(directory().filter("zzz").is_empty());
    }

    #[test]
    fn request_url_encodes_query_parameter() {
        let lookup = ReqwestUserLookup::new(LookupSettings {
            endpoint: "http://example.com/api/users?limit=10".to_string(),
            ..LookupSettings::default()
        })
        .unwrap();
        assert_eq!(
            lookup.request_url("a b&c").as_str(),
            "http://example.com/api/users?limit=10&q=a+b%26c"
        );
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let err = ReqwestUserLookup::new(LookupSettings {
            endpoint: "not a url".to_string(),
            ..LookupSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidEndpoint);
    }
}
