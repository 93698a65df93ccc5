//! SonarQube issue search client
//!
//! Paginated fetcher over `GET /api/issues/search`. For one window it walks
//! pages sequentially in increasing page-number order, stopping when a page
//! comes back smaller than the requested page size. Each individual page
//! request is retried with exponential backoff, but only for transient
//! failures; credential and addressing errors (401/403/404) surface
//! immediately and abort the project export.

use crate::adapters::sonarqube::models::IssueSearchResponse;
use crate::config::{FilterConfig, RetryConfig, SecretString, SonarQubeConfig};
use crate::domain::errors::{SonarApiError, SonarexError};
use crate::domain::ids::ProjectKey;
use crate::domain::issue::RawIssue;
use crate::domain::result::Result;
use crate::domain::window::ExportWindow;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Source of raw issues for one export window.
///
/// The exporter depends on this seam instead of the concrete HTTP client so
/// the pipeline can be exercised without a server.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetch every issue created within `window`, all pages accumulated.
    async fn fetch_window(
        &self,
        project: &ProjectKey,
        window: &ExportWindow,
        filters: &FilterConfig,
    ) -> Result<Vec<RawIssue>>;
}

/// HTTP client for the SonarQube issue search API.
///
/// One instance is created per run and shared across all projects; the
/// underlying connection pool is reused for every request.
pub struct SonarClient {
    base_url: String,
    http: Client,
    token: SecretString,
    page_size: usize,
    retry: RetryConfig,
}

impl SonarClient {
    /// Create a client from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the underlying HTTP client cannot be
    /// built.
    pub fn new(config: &SonarQubeConfig) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                SonarexError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            token: config.token.clone(),
            page_size: config.page_size,
            retry: config.retry.clone(),
        })
    }

    /// Base URL of the SonarQube server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/api/issues/search", self.base_url)
    }

    /// Build the authorization header: a user token is sent as the username
    /// of a Basic credential with an empty password.
    fn auth_header_value(&self) -> String {
        let credentials = format!("{}:", self.token.expose_secret().as_ref());
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {encoded}")
    }

    /// Fetch one page, retrying transient failures with backoff.
    ///
    /// Makes at most `retry.max_attempts` requests. Non-transient errors
    /// are returned from the first attempt that produced them.
    async fn fetch_page(
        &self,
        project: &ProjectKey,
        window: &ExportWindow,
        filters: &FilterConfig,
        page: u32,
    ) -> std::result::Result<Vec<RawIssue>, SonarApiError> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.request_page(project, window, filters, page).await {
                Ok(issues) => return Ok(issues),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) if attempt >= self.retry.max_attempts => {
                    return Err(SonarApiError::RetriesExhausted {
                        attempts: attempt,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay_ms = (self.retry.initial_delay_ms as f64
                        * self.retry.backoff_multiplier.powi(attempt as i32 - 1))
                        as u64;
                    let delay_ms = delay_ms.min(self.retry.max_delay_ms);

                    tracing::warn!(
                        project_key = %project,
                        window = %window,
                        page = page,
                        attempt = attempt,
                        max_attempts = self.retry.max_attempts,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying page request after transient error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    /// Issue a single page request and classify the outcome.
    async fn request_page(
        &self,
        project: &ProjectKey,
        window: &ExportWindow,
        filters: &FilterConfig,
        page: u32,
    ) -> std::result::Result<Vec<RawIssue>, SonarApiError> {
        let mut params: Vec<(&str, String)> = vec![
            ("componentKeys", project.to_string()),
            ("createdAfter", window.created_after()),
            ("createdBefore", window.created_before()),
            ("ps", self.page_size.to_string()),
            ("p", page.to_string()),
        ];
        if !filters.severities.is_empty() {
            params.push(("severities", filters.severities.join(",")));
        }
        if !filters.types.is_empty() {
            params.push(("types", filters.types.join(",")));
        }
        if !filters.statuses.is_empty() {
            params.push(("statuses", filters.statuses.join(",")));
        }

        let response = self
            .http
            .get(self.search_url())
            .query(&params)
            .header("Authorization", self.auth_header_value())
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SonarApiError::from_status(
                status.as_u16(),
                truncate_body(&body),
            ));
        }

        let payload: IssueSearchResponse = response
            .json()
            .await
            .map_err(|e| SonarApiError::MalformedResponse(e.to_string()))?;

        Ok(payload.issues)
    }
}

#[async_trait]
impl IssueSource for SonarClient {
    async fn fetch_window(
        &self,
        project: &ProjectKey,
        window: &ExportWindow,
        filters: &FilterConfig,
    ) -> Result<Vec<RawIssue>> {
        let mut all_issues = Vec::new();
        let mut page: u32 = 1;

        loop {
            let issues = self.fetch_page(project, window, filters, page).await?;
            let page_count = issues.len();
            all_issues.extend(issues);

            // A short page (including empty) signals end-of-results.
            if page_count < self.page_size {
                break;
            }
            page += 1;
        }

        tracing::debug!(
            project_key = %project,
            window = %window,
            pages = page,
            issues = all_issues.len(),
            "Fetched window"
        );

        Ok(all_issues)
    }
}

/// Classify a request-level failure from the HTTP client.
fn classify_request_error(err: reqwest::Error) -> SonarApiError {
    if err.is_timeout() {
        SonarApiError::Timeout(err.to_string())
    } else {
        SonarApiError::ConnectionFailed(err.to_string())
    }
}

/// Keep error bodies log-friendly.
fn truncate_body(body: &str) -> String {
    const MAX_LEN: usize = 500;
    if body.len() <= MAX_LEN {
        return body.to_string();
    }
    let mut end = MAX_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use base64::Engine as _;
    use chrono::NaiveDate;
    use mockito::Matcher;
    use std::str::FromStr;

    fn test_config(base_url: &str) -> SonarQubeConfig {
        SonarQubeConfig {
            base_url: base_url.to_string(),
            token: secret_string("squ_test_token".to_string()),
            timeout_seconds: 5,
            page_size: 500,
            retry: RetryConfig {
                max_attempts: 3,
                initial_delay_ms: 1,
                max_delay_ms: 4,
                backoff_multiplier: 2.0,
            },
        }
    }

    fn window() -> ExportWindow {
        ExportWindow {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        }
    }

    fn issues_payload(count: usize) -> String {
        let issues: Vec<String> = (0..count)
            .map(|i| format!("{{\"key\": \"ISSUE-{i}\"}}"))
            .collect();
        format!("{{\"issues\": [{}]}}", issues.join(","))
    }

    #[test]
    fn test_auth_header_is_basic_token_colon() {
        let client = SonarClient::new(&test_config("https://sonar.example.com")).unwrap();
        // base64("squ_test_token:")
        assert_eq!(
            client.auth_header_value(),
            format!(
                "Basic {}",
                general_purpose::STANDARD.encode(b"squ_test_token:")
            )
        );
    }

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let client = SonarClient::new(&test_config("https://sonar.example.com/")).unwrap();
        assert_eq!(
            client.search_url(),
            "https://sonar.example.com/api/issues/search"
        );
    }

    #[tokio::test]
    async fn test_fetch_window_stops_on_short_page() {
        let mut server = mockito::Server::new_async().await;

        let page1 = server
            .mock("GET", "/api/issues/search")
            .match_query(Matcher::UrlEncoded("p".into(), "1".into()))
            .with_status(200)
            .with_body(issues_payload(500))
            .expect(1)
            .create_async()
            .await;
        let page2 = server
            .mock("GET", "/api/issues/search")
            .match_query(Matcher::UrlEncoded("p".into(), "2".into()))
            .with_status(200)
            .with_body(issues_payload(200))
            .expect(1)
            .create_async()
            .await;

        let client = SonarClient::new(&test_config(&server.url())).unwrap();
        let project = ProjectKey::from_str("my-project").unwrap();
        let issues = client
            .fetch_window(&project, &window(), &FilterConfig::default())
            .await
            .unwrap();

        assert_eq!(issues.len(), 700);
        page1.assert_async().await;
        page2.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_window_empty_page_is_zero_results() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/api/issues/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let client = SonarClient::new(&test_config(&server.url())).unwrap();
        let project = ProjectKey::from_str("my-project").unwrap();
        let issues = client
            .fetch_window(&project, &window(), &FilterConfig::default())
            .await
            .unwrap();

        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn test_transient_503_retried_exactly_max_attempts() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/issues/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("Service Unavailable")
            .expect(3)
            .create_async()
            .await;

        let client = SonarClient::new(&test_config(&server.url())).unwrap();
        let project = ProjectKey::from_str("my-project").unwrap();
        let result = client
            .fetch_window(&project, &window(), &FilterConfig::default())
            .await;

        mock.assert_async().await;
        match result {
            Err(SonarexError::SonarApi(SonarApiError::RetriesExhausted {
                attempts, ..
            })) => assert_eq!(attempts, 3),
            other => panic!("Expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fatal_401_not_retried() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/issues/search")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("Unauthorized")
            .expect(1)
            .create_async()
            .await;

        let client = SonarClient::new(&test_config(&server.url())).unwrap();
        let project = ProjectKey::from_str("my-project").unwrap();
        let result = client
            .fetch_window(&project, &window(), &FilterConfig::default())
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(SonarexError::SonarApi(
                SonarApiError::AuthenticationFailed(_)
            ))
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_not_retried() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/issues/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .expect(1)
            .create_async()
            .await;

        let client = SonarClient::new(&test_config(&server.url())).unwrap();
        let project = ProjectKey::from_str("my-project").unwrap();
        let result = client
            .fetch_window(&project, &window(), &FilterConfig::default())
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(SonarexError::SonarApi(SonarApiError::MalformedResponse(_)))
        ));
    }

    #[tokio::test]
    async fn test_filters_sent_as_query_params() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/issues/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("componentKeys".into(), "my-project".into()),
                Matcher::UrlEncoded("createdAfter".into(), "2025-01-01".into()),
                Matcher::UrlEncoded("createdBefore".into(), "2025-01-31".into()),
                Matcher::UrlEncoded("ps".into(), "500".into()),
                Matcher::UrlEncoded("severities".into(), "BLOCKER,CRITICAL".into()),
                Matcher::UrlEncoded("types".into(), "BUG".into()),
            ]))
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let client = SonarClient::new(&test_config(&server.url())).unwrap();
        let project = ProjectKey::from_str("my-project").unwrap();
        let filters = FilterConfig {
            severities: vec!["BLOCKER".to_string(), "CRITICAL".to_string()],
            types: vec!["BUG".to_string()],
            statuses: Vec::new(),
        };

        client
            .fetch_window(&project, &window(), &filters)
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
