use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode, Url,
    header::{ACCEPT, HeaderMap, HeaderValue},
};

use crate::config::Config;

use super::{GitHubError, GitHubUser, RepoResolver, Resolution};

const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub users API 客户端，进程启动时创建一次
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
}

impl GitHubClient {
    pub fn new(
        api_base: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, GitHubError> {
        let base_url =
            Url::parse(api_base).map_err(|e| GitHubError::InvalidUrl(format!("{api_base}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GitHubError::InvalidUrl(api_base.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(user_agent.to_string());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GitHubError> {
        Self::new(
            &config.github_api_base,
            &config.github_user_agent,
            config.upstream_timeout(),
        )
    }

    /// 用户名作为单独的路径段编码
    fn user_url(&self, username: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users").push(username);
        }
        url
    }

    /// 获取用户信息，404 / 410 返回 `None`
    pub async fn fetch_user(&self, username: &str) -> Result<Option<GitHubUser>, GitHubError> {
        let response = self.client.get(self.user_url(username)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GitHubError::UnexpectedStatus(status));
        }

        Ok(Some(response.json::<GitHubUser>().await?))
    }
}

#[async_trait]
impl RepoResolver for GitHubClient {
    async fn resolve(&self, username: &str) -> Resolution {
        match self.fetch_user(username).await {
            Ok(Some(GitHubUser {
                public_repos: Some(count),
            })) => Resolution::Found(count),
            Ok(Some(_)) => {
                tracing::warn!("GitHub response for {} has no public_repos", username);
                Resolution::NotFound
            }
            Ok(None) => Resolution::NotFound,
            Err(e) => {
                tracing::error!("GitHub lookup for {} failed: {}", username, e);
                Resolution::UpstreamError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::get,
    };
    use serde_json::json;

    use super::*;

    const TEST_AGENT: &str = "repocount-tests";

    async fn fake_user(Path(username): Path<String>, headers: HeaderMap) -> Response {
        let agent = headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if agent != TEST_AGENT {
            return StatusCode::BAD_REQUEST.into_response();
        }

        match username.as_str() {
            "octocat" => Json(json!({ "login": "octocat", "public_repos": 8 })).into_response(),
            "jdoe_acme" => Json(json!({ "login": "jdoe_acme", "public_repos": 3 })).into_response(),
            "a.b" => Json(json!({ "login": "a.b", "public_repos": 1 })).into_response(),
            "newbie" => Json(json!({ "login": "newbie", "public_repos": 0 })).into_response(),
            "partial" => Json(json!({ "login": "partial" })).into_response(),
            "weird" => Json(json!({ "public_repos": "many" })).into_response(),
            "broken" => "<html>oops</html>".into_response(),
            "limited" => StatusCode::TOO_MANY_REQUESTS.into_response(),
            "flaky" => StatusCode::BAD_GATEWAY.into_response(),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Not Found" })),
            )
                .into_response(),
        }
    }

    async fn spawn_upstream() -> String {
        let router = Router::new().route("/users/{username}", get(fake_user));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn client() -> GitHubClient {
        GitHubClient::new(&spawn_upstream().await, TEST_AGENT, None).unwrap()
    }

    #[tokio::test]
    async fn found_user_reports_count() {
        let client = client().await;
        assert_eq!(client.resolve("octocat").await, Resolution::Found(8));
    }

    #[tokio::test]
    async fn zero_repositories_is_still_found() {
        let client = client().await;
        assert_eq!(client.resolve("newbie").await, Resolution::Found(0));
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let client = client().await;
        assert_eq!(
            client.resolve("this-user-should-not-exist-xyz").await,
            Resolution::NotFound
        );
    }

    #[tokio::test]
    async fn missing_field_is_not_found() {
        let client = client().await;
        assert_eq!(client.resolve("partial").await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn malformed_payloads_are_upstream_errors() {
        let client = client().await;
        assert_eq!(client.resolve("broken").await, Resolution::UpstreamError);
        assert_eq!(client.resolve("weird").await, Resolution::UpstreamError);
    }

    #[tokio::test]
    async fn other_error_statuses_are_upstream_errors() {
        let client = client().await;
        assert_eq!(client.resolve("limited").await, Resolution::UpstreamError);
        assert_eq!(client.resolve("flaky").await, Resolution::UpstreamError);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_an_upstream_error() {
        let client = GitHubClient::new("http://127.0.0.1:1", TEST_AGENT, None).unwrap();
        assert_eq!(client.resolve("octocat").await, Resolution::UpstreamError);
    }

    #[tokio::test]
    async fn login_rules_are_left_to_the_upstream() {
        let client = client().await;
        assert_eq!(client.resolve("jdoe_acme").await, Resolution::Found(3));
        assert_eq!(client.resolve("a.b").await, Resolution::Found(1));
        assert_eq!(
            client.resolve(&"a".repeat(40)).await,
            Resolution::NotFound
        );
    }

    #[tokio::test]
    async fn every_lookup_reaches_the_upstream() {
        // 上游不可达，任何发出的请求都得到 UpstreamError
        let client = GitHubClient::new("http://127.0.0.1:1", TEST_AGENT, None).unwrap();
        assert_eq!(client.resolve("jdoe_acme").await, Resolution::UpstreamError);
        assert_eq!(client.resolve("a?b=c").await, Resolution::UpstreamError);
    }

    #[test]
    fn usernames_are_encoded_as_one_segment() {
        let client = GitHubClient::new("https://api.github.com", TEST_AGENT, None).unwrap();
        assert_eq!(
            client.user_url("a?b=c/d").as_str(),
            "https://api.github.com/users/a%3Fb=c%2Fd"
        );
    }

    #[test]
    fn user_url_keeps_base_path() {
        let client =
            GitHubClient::new("https://ghe.example.com/api/v3/", TEST_AGENT, None).unwrap();
        assert_eq!(
            client.user_url("octocat").as_str(),
            "https://ghe.example.com/api/v3/users/octocat"
        );

        let client = GitHubClient::new("https://api.github.com", TEST_AGENT, None).unwrap();
        assert_eq!(
            client.user_url("octocat").as_str(),
            "https://api.github.com/users/octocat"
        );
    }

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(
            GitHubClient::new("not a url", TEST_AGENT, None),
            Err(GitHubError::InvalidUrl(_))
        ));
        assert!(matches!(
            GitHubClient::new("mailto:someone@example.com", TEST_AGENT, None),
            Err(GitHubError::InvalidUrl(_))
        ));
    }
}
