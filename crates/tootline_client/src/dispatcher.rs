//! The single call boundary every operation module goes through.

use crate::{Credentials, RequestOptions};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use reqwest::{Method, StatusCode};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tootline_cache::ResponseCache;
use tootline_error::{
    ApiError, ApiErrorKind, ConfigError, RetryableError, TootlineError, TootlineErrorKind,
    TootlineResult, ValidationError,
};
use tootline_queue::{RateLimits, RequestQueue, TaskResult};
use tracing::{debug, info, instrument, warn};

/// Query string parameters for a dispatched request.
pub type Query = Vec<(String, String)>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
const LOW_BUDGET_WARNING: u64 = 50;
const USER_AGENT: &str = concat!("tootline/", env!("CARGO_PKG_VERSION"));

/// Dispatch/retry orchestrator for one Mastodon account.
///
/// Builds request options, resolves the access token from [`Credentials`],
/// submits the network call as a unit of work to the shared
/// [`RequestQueue`], and classifies failures. Retries re-enter the queue as
/// fresh tasks, so every attempt respects FIFO order and the shared
/// rate-limit budget.
#[derive(Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    credentials: Credentials,
    queue: Arc<RequestQueue>,
    cache: Arc<Mutex<ResponseCache>>,
}

impl Dispatcher {
    /// Create a dispatcher wired to a queue and response cache.
    pub fn new(
        credentials: Credentials,
        queue: Arc<RequestQueue>,
        cache: Arc<Mutex<ResponseCache>>,
    ) -> TootlineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            credentials,
            queue,
            cache,
        })
    }

    /// Perform one logical API call: `method` against `endpoint` with an
    /// optional JSON `body`, `query` parameters and extra `options`.
    ///
    /// Returns the parsed response body. Caching, rate limiting and retries
    /// are transparent to the caller: transient failures are retried with
    /// exponential backoff, a first 429 is requeued behind the rate-limit
    /// wait, and terminal conditions surface as a single descriptive error.
    #[instrument(skip(self, body, query, options), fields(method = %method, endpoint))]
    pub async fn dispatch(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<JsonValue>,
        query: Query,
        options: RequestOptions,
    ) -> TootlineResult<JsonValue> {
        self.credentials.validate()?;
        let url = self.credentials.endpoint_url(endpoint);

        let mut attempt: usize = 0;
        loop {
            let work = Attempt {
                client: self.client.clone(),
                limits: self.queue.limits(),
                cache: Arc::clone(&self.cache),
                token: self.credentials.access_token().clone(),
                method: method.clone(),
                url: url.clone(),
                body: body.clone(),
                query: query.clone(),
                options: options.clone(),
            };

            let err = match self.queue.add(Box::pin(work.run())).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            // A first 429 is requeued rather than failed: the queue worker
            // will wait out the reset the response just installed.
            if attempt == 0
                && let TootlineErrorKind::Api(api) = err.kind()
                && let ApiErrorKind::RateLimit { retry_after_secs } = &api.kind
            {
                info!(
                    retry_after_secs,
                    "rate limit hit; requeueing request behind the reset"
                );
                attempt = 1;
                continue;
            }

            if let Some(delay) = retry_delay(&err, attempt) {
                info!(
                    delay_ms = delay.as_millis() as u64,
                    attempt = attempt + 1,
                    "retrying request"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Err(err);
        }
    }

    /// Drop cached GET responses whose URL contains `pattern`.
    ///
    /// Operation modules call this after mutations so stale reads are not
    /// served from cache.
    pub async fn invalidate_cached(&self, pattern: &str) -> usize {
        self.cache.lock().await.invalidate_pattern(pattern)
    }

    /// The queue this dispatcher submits work to.
    pub fn queue(&self) -> &Arc<RequestQueue> {
        &self.queue
    }

    /// The credentials this dispatcher resolves on every call.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// One queued attempt at a network call. Owns everything it needs so the
/// future is `'static` for the queue.
struct Attempt {
    client: reqwest::Client,
    limits: RateLimits,
    cache: Arc<Mutex<ResponseCache>>,
    token: String,
    method: Method,
    url: String,
    body: Option<JsonValue>,
    query: Query,
    options: RequestOptions,
}

impl Attempt {
    async fn run(self) -> TaskResult {
        let params_key = params_fingerprint(&self.query, &self.options);

        // A cache hit consumes this queue slot but performs no network I/O
        // and debits no rate-limit budget.
        if self.method == Method::GET
            && let Some(cached) = self
                .cache
                .lock()
                .await
                .get(self.method.as_str(), &self.url, &params_key)
        {
            debug!(url = %self.url, "cache hit");
            return Ok(cached);
        }

        let request = self.build_request()?;
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %self.url, error = %e, "network error");
                return Err(ApiError::new(ApiErrorKind::Network(format!(
                    "please check if {} is accessible: {e}",
                    self.url
                )))
                .into());
            }
        };

        // The request reached the server, so one call of the shared budget
        // is spent whatever the outcome.
        self.limits.debit().await;

        let status = response.status();
        self.apply_rate_limit_headers(response.headers()).await;

        if status.is_success() {
            let value = parse_body(&self.url, response.text().await.unwrap_or_default())?;
            if self.method == Method::GET {
                self.cache.lock().await.insert(
                    self.method.as_str(),
                    &self.url,
                    &params_key,
                    value.clone(),
                    None,
                );
            }
            return Ok(value);
        }

        let retry_after = parse_header_u64(response.headers(), "retry-after")
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        let message = response.text().await.unwrap_or_default();
        Err(self.classify(status, retry_after, message).await.into())
    }

    fn build_request(&self) -> TootlineResult<reqwest::RequestBuilder> {
        let mut request = self
            .client
            .request(self.method.clone(), &self.url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json");

        if !self.query.is_empty() {
            request = request.query(&self.query);
        }
        for (name, value) in self.options.headers() {
            request = request.header(name, value);
        }

        if let Some(upload) = self.options.upload() {
            // Multipart replaces any JSON body; reqwest sets the boundary
            // content type itself.
            let part = reqwest::multipart::Part::bytes(upload.bytes().clone())
                .file_name(upload.file_name().clone())
                .mime_str(upload.mime_type())
                .map_err(|e| {
                    ValidationError::new(format!(
                        "Invalid MIME type {:?}: {e}",
                        upload.mime_type()
                    ))
                })?;
            let mut form = reqwest::multipart::Form::new().part(upload.field_name().clone(), part);
            if let Some(description) = upload.description() {
                form = form.text("description", description.clone());
            }
            request = request.multipart(form);
        } else if let Some(body) = &self.body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .json(body);
        }

        Ok(request)
    }

    async fn apply_rate_limit_headers(&self, headers: &HeaderMap) {
        if let (Some(remaining), Some(reset)) = (
            parse_header_u64(headers, "x-ratelimit-remaining"),
            parse_header_u64(headers, "x-ratelimit-reset"),
        ) {
            let limit = parse_header_u64(headers, "x-ratelimit-limit");
            self.limits
                .update(remaining as u32, reset, limit.map(|l| l as u32))
                .await;
            if remaining < LOW_BUDGET_WARNING {
                warn!(remaining, limit = limit.unwrap_or(0), "rate limit running low");
            }
        }
    }

    async fn classify(&self, status: StatusCode, retry_after: u64, message: String) -> ApiError {
        let kind = match status.as_u16() {
            401 => ApiErrorKind::Auth,
            403 => ApiErrorKind::Permission,
            404 => ApiErrorKind::NotFound {
                resource: resource_name(&self.url),
            },
            429 => {
                // Install the synthetic wait the queue will honor for every
                // task behind this one.
                self.limits.update(0, epoch_now() + retry_after, None).await;
                ApiErrorKind::RateLimit {
                    retry_after_secs: retry_after,
                }
            }
            s @ (502 | 503 | 504) => ApiErrorKind::Unavailable { status: s },
            s => ApiErrorKind::Api { status: s, message },
        };
        ApiError::new(kind)
    }
}

/// Parse a response body as JSON, passing raw text through for non-JSON
/// payloads and mapping an empty body to null.
fn parse_body(url: &str, text: String) -> TootlineResult<JsonValue> {
    if text.is_empty() {
        return Ok(JsonValue::Null);
    }
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(e) => {
            debug!(url, error = %e, "response body is not JSON; returning raw text");
            Ok(JsonValue::String(text))
        }
    }
}

/// Deterministic fingerprint of query parameters and options, used as the
/// cache key component for "serialized query-and-options".
fn params_fingerprint(query: &Query, options: &RequestOptions) -> String {
    json!({
        "query": query,
        "headers": options.headers(),
        "upload": options.upload().as_ref().map(|u| u.file_name()),
    })
    .to_string()
}

/// Singularized final path segment, used in 404 messages: a miss on
/// `/api/v1/statuses/123/favourite` names a missing "favourite".
fn resource_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("resource");
    let singular = segment.strip_suffix('s').unwrap_or(segment);
    if singular.is_empty() {
        "resource".to_string()
    } else {
        singular.to_string()
    }
}

/// Helper to parse u64 from a header value.
fn parse_header_u64(headers: &HeaderMap, key: &str) -> Option<u64> {
    headers.get(key)?.to_str().ok()?.parse().ok()
}

/// Backoff before the next attempt, or None when the error is terminal or
/// the retry budget is spent.
fn retry_delay(err: &TootlineError, attempt: usize) -> Option<Duration> {
    let (base_delay_ms, max_retries, max_delay_secs) = err.retry_strategy_params();
    if err.is_retryable() && attempt < max_retries {
        Some(backoff_delay(base_delay_ms, attempt, max_delay_secs))
    } else {
        None
    }
}

fn backoff_delay(base_delay_ms: u64, attempt: usize, max_delay_secs: u64) -> Duration {
    let factor = 1u64 << attempt.min(16);
    Duration::from_millis(base_delay_ms.saturating_mul(factor).min(max_delay_secs * 1000))
}

fn epoch_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable() -> TootlineError {
        ApiError::new(ApiErrorKind::Unavailable { status: 503 }).into()
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let err = unavailable();
        assert_eq!(retry_delay(&err, 0), Some(Duration::from_millis(3000)));
        assert_eq!(retry_delay(&err, 1), Some(Duration::from_millis(6000)));
        assert_eq!(retry_delay(&err, 3), Some(Duration::from_millis(24000)));
        // 3000 * 2^4 = 48s exceeds the 30s ceiling.
        assert_eq!(retry_delay(&err, 4), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_retries_stop_once_the_budget_is_spent() {
        assert_eq!(retry_delay(&unavailable(), 5), None);

        let network: TootlineError =
            ApiError::new(ApiErrorKind::Network("connection timed out".to_string())).into();
        assert!(retry_delay(&network, 4).is_some());
        assert_eq!(retry_delay(&network, 5), None);
    }

    #[test]
    fn test_terminal_errors_are_never_retried() {
        let kinds = [
            ApiErrorKind::Auth,
            ApiErrorKind::Permission,
            ApiErrorKind::NotFound {
                resource: "status".to_string(),
            },
            ApiErrorKind::RateLimit {
                retry_after_secs: 60,
            },
            ApiErrorKind::Api {
                status: 422,
                message: "Validation failed".to_string(),
            },
        ];
        for kind in kinds {
            let err: TootlineError = ApiError::new(kind).into();
            assert_eq!(retry_delay(&err, 0), None);
        }
    }

    #[test]
    fn test_resource_name_singularizes_the_last_segment() {
        assert_eq!(resource_name("https://s/api/v1/statuses/123"), "123");
        assert_eq!(
            resource_name("https://s/api/v1/statuses/1/favourite?x=1"),
            "favourite"
        );
        assert_eq!(resource_name("https://s/api/v1/statuses"), "statuse");
        assert_eq!(resource_name("https://s/"), "resource");
    }
}
