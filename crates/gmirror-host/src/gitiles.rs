use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Deserialize;
use url::Url;

use gmirror_core::catalog::RepoMap;
use gmirror_core::error::MirrorError;

use crate::CatalogSource;

/// Anti-XSSI line Gitiles puts in front of every JSON response.
const XSSI_PREFIX: &[u8] = b")]}'\n";

/// Lists every project on a Gitiles host.
pub struct GitilesLister {
    client: reqwest::Client,
    base_url: Url,
}

impl GitilesLister {
    pub fn new(base_url: Url, user_agent: &str) -> Result<Self, MirrorError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(val) = HeaderValue::from_str(user_agent) {
            headers.insert(header::USER_AGENT, val);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| MirrorError::Transport {
                url: base_url.to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, base_url })
    }
}

#[derive(Deserialize)]
struct GitilesProject {
    clone_url: String,
}

/// The base URL with its query replaced by `format=JSON`.
pub fn catalog_url(base: &Url) -> Url {
    let mut url = base.clone();
    url.set_query(Some("format=JSON"));
    url
}

/// Decode a `?format=JSON` project listing into a name to clone-URL map.
pub fn parse_catalog(body: &[u8]) -> Result<RepoMap, MirrorError> {
    let body = body.strip_prefix(XSSI_PREFIX).unwrap_or(body);

    let projects: HashMap<String, GitilesProject> =
        serde_json::from_slice(body).map_err(|e| MirrorError::Decode {
            message: e.to_string(),
        })?;

    Ok(projects
        .into_iter()
        .map(|(name, project)| (name, project.clone_url))
        .collect())
}

#[async_trait]
impl CatalogSource for GitilesLister {
    async fn list_repos(&self) -> Result<RepoMap, MirrorError> {
        let url = catalog_url(&self.base_url);
        tracing::debug!("fetching catalog from {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MirrorError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        // Status is not checked: an error page fails to decode anyway.
        if !resp.status().is_success() {
            tracing::warn!("catalog request returned {}", resp.status());
        }

        let body = resp.bytes().await.map_err(|e| MirrorError::Transport {
            url: url.to_string(),
            message: format!("reading body: {e}"),
        })?;

        let repos = parse_catalog(&body)?;
        tracing::info!("found {} repos on {}", repos.len(), self.base_url);
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CATALOG: &str = r#"{
  "a/b": {"name": "a/b", "clone_url": "http://x/a/b", "state": "ACTIVE"},
  "c": {"name": "c", "clone_url": "http://x/c"}
}"#;

    #[test]
    fn test_parse_with_and_without_prefix() {
        let plain = parse_catalog(CATALOG.as_bytes()).unwrap();
        let prefixed = parse_catalog(format!(")]}}'\n{CATALOG}").as_bytes()).unwrap();

        assert_eq!(plain, prefixed);
        assert_eq!(plain.len(), 2);
        assert_eq!(plain["a/b"], "http://x/a/b");
        assert_eq!(plain["c"], "http://x/c");
    }

    #[test]
    fn test_parse_empty_catalog() {
        assert!(parse_catalog(b")]}'\n{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_body() {
        let err = parse_catalog(b"<html>Not Found</html>").unwrap_err();
        assert!(matches!(err, MirrorError::Decode { .. }));
    }

    #[test]
    fn test_parse_rejects_missing_clone_url() {
        let err = parse_catalog(br#"{"a": {"name": "a"}}"#).unwrap_err();
        assert!(matches!(err, MirrorError::Decode { .. }));
    }

    #[test]
    fn test_parse_duplicate_name_last_wins() {
        let repos =
            parse_catalog(br#"{"a": {"clone_url": "http://1"}, "a": {"clone_url": "http://2"}}"#)
                .unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos["a"], "http://2");
    }

    #[test]
    fn test_catalog_url_replaces_query() {
        let base = Url::parse("https://host.example/gitiles/?format=TEXT&foo=bar").unwrap();
        assert_eq!(
            catalog_url(&base).as_str(),
            "https://host.example/gitiles/?format=JSON"
        );
    }

    #[tokio::test]
    async fn test_list_repos_from_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("format", "JSON"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(format!(")]}}'\n{CATALOG}")),
            )
            .mount(&mock_server)
            .await;

        let base = Url::parse(&format!("{}/?p=ignored", mock_server.uri())).unwrap();
        let lister = GitilesLister::new(base, "gmirror-test").unwrap();
        let repos = lister.list_repos().await.unwrap();

        assert_eq!(repos.len(), 2);
        assert_eq!(repos["c"], "http://x/c");
    }

    #[tokio::test]
    async fn test_list_repos_error_page_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let base = Url::parse(&mock_server.uri()).unwrap();
        let lister = GitilesLister::new(base, "gmirror-test").unwrap();
        let err = lister.list_repos().await.unwrap_err();

        assert!(matches!(err, MirrorError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_list_repos_unreachable_host() {
        let mock_server = MockServer::builder().start().await;
        let base = Url::parse(&mock_server.uri()).unwrap();
        drop(mock_server);

        let lister = GitilesLister::new(base, "gmirror-test").unwrap();
        let err = lister.list_repos().await.unwrap_err();

        assert!(matches!(err, MirrorError::Transport { .. }));
    }
}
