use crate::error::FetchError;
use crate::types::{ApiRepo, Repository};
use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::time::Duration;

const BASE_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;
const MAX_RATE_LIMIT_RETRIES: u32 = 3;
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Fetches repository metadata for a GitHub organization over the REST API.
pub struct Fetcher {
    client: Client,
    token: Option<String>,
}

impl Fetcher {
    /// Picks up `GITHUB_TOKEN` from the environment if set. Unauthenticated
    /// requests work but hit a much lower rate limit.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_token(std::env::var("GITHUB_TOKEN").ok())
    }

    pub fn with_token(token: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("orgmap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Fetcher { client, token })
    }

    /// Fetches every repository in `org`, following pagination until an
    /// empty page comes back. Forks and archived repositories are dropped
    /// unless the matching flag is set. Malformed items are skipped with a
    /// warning; they never fail the run.
    pub fn fetch_org_repos(
        &self,
        org: &str,
        include_forks: bool,
        include_archived: bool,
    ) -> Result<Vec<Repository>, FetchError> {
        let mut repos = Vec::new();
        let mut page = 1usize;

        loop {
            let items = self.fetch_page(org, page)?;
            if items.is_empty() {
                break;
            }
            debug!("page {}: {} items", page, items.len());

            let mut parsed = Vec::with_capacity(items.len());
            for item in items {
                match item.into_repository() {
                    Some(repo) => parsed.push(repo),
                    None => warn!("skipping malformed repository item on page {}", page),
                }
            }
            repos.extend(filter_repos(parsed, include_forks, include_archived));

            page += 1;
        }

        info!("fetched {} repositories from {}", repos.len(), org);
        Ok(repos)
    }

    /// One page of the org listing, retrying on rate-limit responses.
    fn fetch_page(&self, org: &str, page: usize) -> Result<Vec<ApiRepo>, FetchError> {
        let url = format!("{}/orgs/{}/repos", BASE_URL, urlencoding::encode(org));
        let mut attempts = 0u32;

        loop {
            let result = self.get_page(&url, org, page);
            match result {
                Err(FetchError::RateLimited { retry_after }) if attempts < MAX_RATE_LIMIT_RETRIES => {
                    attempts += 1;
                    warn!(
                        "rate limited, sleeping {:?} before retry {}/{}",
                        retry_after, attempts, MAX_RATE_LIMIT_RETRIES
                    );
                    std::thread::sleep(retry_after);
                }
                other => return other,
            }
        }
    }

    fn get_page(&self, url: &str, org: &str, page: usize) -> Result<Vec<ApiRepo>, FetchError> {
        let mut request = self
            .client
            .get(url)
            .query(&[
                ("page", page.to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
            ])
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send()?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                org: org.to_string(),
            });
        }
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(retry_after) = rate_limit_delay(status, response.headers()) {
                return Err(FetchError::RateLimited { retry_after });
            }
            return Err(FetchError::Api { status });
        }
        if !status.is_success() {
            return Err(FetchError::Api { status });
        }

        Ok(response.json()?)
    }
}

/// Works out how long to wait from a 403/429 response, or `None` when the
/// response is a plain permission failure rather than rate limiting.
///
/// A 429 always means rate limiting, headers or not; a 403 only counts
/// when the rate-limit headers say the quota is exhausted.
fn rate_limit_delay(status: StatusCode, headers: &HeaderMap) -> Option<Duration> {
    if let Some(secs) = header_u64(headers, "retry-after") {
        return Some(Duration::from_secs(secs));
    }

    // Primary-limit responses carry x-ratelimit-remaining: 0 plus a reset
    // time as a unix timestamp. Secondary limits can report a healthy
    // remaining count, so for 429 the status alone decides.
    match header_u64(headers, "x-ratelimit-remaining") {
        Some(0) => Some(reset_delay(headers)),
        _ if status == StatusCode::TOO_MANY_REQUESTS => Some(DEFAULT_RETRY_AFTER),
        _ => None,
    }
}

fn reset_delay(headers: &HeaderMap) -> Duration {
    header_u64(headers, "x-ratelimit-reset")
        .map(|reset| {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            Duration::from_secs(reset.saturating_sub(now).max(1))
        })
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Applies the fork/archived inclusion filters to a parsed page of records.
pub fn filter_repos(
    repos: Vec<Repository>,
    include_forks: bool,
    include_archived: bool,
) -> Vec<Repository> {
    repos
        .into_iter()
        .filter(|r| (include_forks || !r.is_fork) && (include_archived || !r.archived))
        .collect()
}
