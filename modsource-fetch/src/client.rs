//! HTTP client for the GitHub REST API with bounded rate-limit retries.

use tokio::time::Duration;

use crate::error::SyncError;
use crate::source::ReleaseSource;
use crate::types::Release;

const BASE_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;
const MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_secs(60);

/// GitHub API client. Authentication is optional; unauthenticated requests
/// work but hit the much lower anonymous rate limit.
pub struct GithubClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<String>) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("modsource/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, token })
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Issue a GET, waiting and retrying when GitHub rate-limits or flags the
    /// request for abuse. After MAX_RETRIES the failure propagates upward.
    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response, SyncError> {
        for attempt in 1..=MAX_RETRIES {
            let resp = self.request(url).send().await?;
            let status = resp.status();

            let rate_limited = status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || (status == reqwest::StatusCode::FORBIDDEN && rate_limit_exhausted(&resp));
            if !rate_limited {
                return Ok(resp);
            }
            if attempt == MAX_RETRIES {
                break;
            }

            let wait = retry_after(&resp).unwrap_or(DEFAULT_BACKOFF);
            log::warn!(
                "GitHub rate limit hit on {url}, waiting {}s (attempt {attempt}/{MAX_RETRIES})",
                wait.as_secs()
            );
            tokio::time::sleep(wait).await;
        }
        Err(SyncError::RateLimited {
            retries: MAX_RETRIES,
        })
    }
}

impl ReleaseSource for GithubClient {
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, SyncError> {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let url =
                format!("{BASE_URL}/repos/{owner}/{repo}/releases?per_page={PER_PAGE}&page={page}");
            let resp = self.get_with_retry(&url).await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(SyncError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            let releases: Vec<Release> = resp.json().await?;
            let count = releases.len();
            all.extend(releases);
            if count < PER_PAGE {
                break;
            }
            page += 1;
        }
        log::debug!("{owner}/{repo}: {} releases across {page} page(s)", all.len());
        Ok(all)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, SyncError> {
        let resp = self.get_with_retry(url).await?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(SyncError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

fn rate_limit_exhausted(resp: &reqwest::Response) -> bool {
    resp.headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0")
}

fn retry_after(resp: &reqwest::Response) -> Option<Duration> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}
