use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use replyrate_report::{Reply, Ticket, TicketSource};

/// Connection settings for one SupportBee account.
///
/// Credentials arrive here explicitly; nothing in the workspace reads them
/// from process globals.
#[derive(Debug, Clone)]
pub struct SupportBeeConfig {
    pub subdomain: String,
    pub auth_token: String,
    /// Overrides the `https://{subdomain}.supportbee.com` base, for tests.
    pub api_base: Option<String>,
    pub request_timeout_ms: u64,
    pub retry_max_attempts: usize,
    pub retry_base_delay_ms: u64,
}

impl SupportBeeConfig {
    pub fn new(subdomain: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            subdomain: subdomain.into(),
            auth_token: auth_token.into(),
            api_base: None,
            request_timeout_ms: 30_000,
            retry_max_attempts: 3,
            retry_base_delay_ms: 500,
        }
    }
}

/// Bounded retry for transient upstream failures.
///
/// Delays double per attempt from `base_delay` up to [`RetryPolicy::DELAY_CAP`].
/// A `Retry-After` hint from the server replaces the computed delay, clamped
/// to the same bounds.
#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_attempts: usize,
    base_delay: Duration,
}

impl RetryPolicy {
    const DELAY_CAP: Duration = Duration::from_secs(30);

    fn allows_another(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }

    fn delay(&self, attempt: usize, upstream_hint: Option<Duration>) -> Duration {
        if let Some(hint) = upstream_hint {
            return hint.max(self.base_delay).min(Self::DELAY_CAP);
        }
        let mut delay = self.base_delay;
        for _ in 1..attempt {
            delay = (delay * 2).min(Self::DELAY_CAP);
        }
        delay
    }
}

/// One failed request attempt, classified for the retry loop.
#[derive(Debug)]
enum RequestFailure {
    Status {
        status: StatusCode,
        body: String,
        retry_after: Option<Duration>,
    },
    Transport(reqwest::Error),
}

impl RequestFailure {
    /// Worth another attempt: rate limiting, server-side errors, timeouts,
    /// and connection failures. Client-side statuses are terminal.
    fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::Transport(error) => error.is_timeout() || error.is_connect(),
        }
    }

    fn retry_hint(&self) -> Option<Duration> {
        match self {
            Self::Status { retry_after, .. } => *retry_after,
            Self::Transport(_) => None,
        }
    }

    fn into_report(self, operation: &str) -> anyhow::Error {
        match self {
            Self::Status { status, body, .. } => anyhow!(
                "supportbee {operation} failed with status {}: {}",
                status.as_u16(),
                error_snippet(&body)
            ),
            Self::Transport(error) => anyhow::Error::new(error)
                .context(format!("supportbee {operation} request failed")),
        }
    }
}

/// First line of an error body, bounded so a misbehaving upstream cannot
/// flood the log.
fn error_snippet(body: &str) -> String {
    let line = body.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return "<empty body>".to_string();
    }
    line.chars().take(200).collect()
}

fn retry_after_hint(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[derive(Debug, Deserialize)]
struct TicketPage {
    #[serde(default)]
    tickets: Vec<Ticket>,
}

#[derive(Debug, Deserialize)]
struct ReplyEnvelope {
    #[serde(default)]
    replies: Vec<Reply>,
}

/// Async client for the SupportBee REST API.
#[derive(Clone)]
pub struct SupportBeeClient {
    http: reqwest::Client,
    api_base: String,
    auth_token: String,
    retry: RetryPolicy,
}

impl SupportBeeClient {
    pub fn new(config: SupportBeeConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()
            .context("failed to create supportbee api client")?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| format!("https://{}.supportbee.com", config.subdomain.trim()));
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.trim().to_string(),
            retry: RetryPolicy {
                max_attempts: config.retry_max_attempts.max(1),
                base_delay: Duration::from_millis(config.retry_base_delay_ms.max(1)),
            },
        })
    }

    /// Lists every ticket active in `[since, until]`, walking pages from 1
    /// upward until a page comes back empty.
    pub async fn fetch_all_tickets(&self, since: &str, until: &str) -> Result<Vec<Ticket>> {
        let mut page = 1_u32;
        let mut rows = Vec::new();
        loop {
            let page_value = page.to_string();
            let chunk: TicketPage = self
                .request_json("list tickets", || {
                    self.http.get(format!("{}/tickets", self.api_base)).query(&[
                        ("auth_token", self.auth_token.as_str()),
                        ("since", since),
                        ("until", until),
                        ("page", page_value.as_str()),
                        ("sort_by", "last_activity"),
                    ])
                })
                .await?;
            if chunk.tickets.is_empty() {
                break;
            }
            rows.extend(chunk.tickets);
            page = page.saturating_add(1);
        }
        Ok(rows)
    }

    /// Fetches the full reply thread for one ticket.
    pub async fn fetch_ticket_replies(&self, ticket_id: &str) -> Result<Vec<Reply>> {
        let envelope: ReplyEnvelope = self
            .request_json("list replies", || {
                self.http
                    .get(format!("{}/tickets/{}/replies", self.api_base, ticket_id))
                    .query(&[("auth_token", self.auth_token.as_str())])
            })
            .await?;
        Ok(envelope.replies)
    }

    async fn request_json<T, F>(&self, operation: &str, mut build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnMut() -> reqwest::RequestBuilder,
    {
        let mut attempt = 1_usize;
        loop {
            let request = build().header("x-replyrate-attempt", attempt.to_string());
            match self.try_request(request).await {
                Ok(response) => {
                    return response.json::<T>().await.with_context(|| {
                        format!("failed to decode supportbee {operation} response")
                    });
                }
                Err(failure) if failure.is_transient() && self.retry.allows_another(attempt) => {
                    tokio::time::sleep(self.retry.delay(attempt, failure.retry_hint())).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.into_report(operation)),
            }
        }
    }

    async fn try_request(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, RequestFailure> {
        let response = request.send().await.map_err(RequestFailure::Transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let retry_after = retry_after_hint(&response);
        let body = response.text().await.unwrap_or_default();
        Err(RequestFailure::Status {
            status,
            body,
            retry_after,
        })
    }
}

#[async_trait]
impl TicketSource for SupportBeeClient {
    async fn fetch_tickets(&self, since: &str, until: &str) -> Result<Vec<Ticket>> {
        self.fetch_all_tickets(since, until).await
    }

    async fn fetch_replies(&self, ticket_id: &str) -> Result<Vec<Reply>> {
        self.fetch_ticket_replies(ticket_id).await
    }
}
