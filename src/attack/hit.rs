use std::error::Error as StdError;
use std::fmt::Write as _;

use chrono::Utc;
use futures_util::StreamExt;
use md5::{Digest, Md5};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Request, Response, StatusCode};
use tokio::time::{Instant, timeout};
use tracing::{debug, warn};

use crate::results::{AttackResult, VALIDATION_FAILED_CODE};
use crate::targets::Target;

use super::Attacker;

impl Attacker {
    /// Runs one attempt against `target`.
    ///
    /// Never fails: build, transport, status and validation problems all end
    /// up in the returned result. Failures are also logged.
    pub async fn hit(&self, target: &Target) -> AttackResult {
        let result = self.attempt(target).await;
        if result.is_failure() {
            warn!(code = result.code, "{}", result.error);
        }
        result
    }

    async fn attempt(&self, target: &Target) -> AttackResult {
        let mut result = AttackResult::started_at(Utc::now());
        let request = match target.request(&self.client) {
            Ok(request) => request,
            Err(err) => {
                result.error = err.to_string();
                return result;
            }
        };
        let bytes_out = outbound_length(&request);

        result.timestamp = Utc::now();
        let started = Instant::now();
        let response = match timeout(self.timeout, self.client.execute(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                result.error = error_chain(&err);
                return result;
            }
            Err(elapsed) => {
                result.error = format!(
                    "{} {}: timeout awaiting response headers ({})",
                    target.method, target.url, elapsed
                );
                return result;
            }
        };

        let status = response.status();
        result.code = status.as_u16();
        result.bytes_out = bytes_out;

        let expected_md5 = target.expected_md5();
        let mut hasher = expected_md5.as_ref().map(|_| Md5::new());
        let bytes_in = match read_body(response, hasher.as_mut()).await {
            Ok(bytes_in) => bytes_in,
            Err(err) => {
                debug!("Failed to read response body: {}", err);
                if !status.is_success() {
                    result.error = status_error(target, status);
                }
                return result;
            }
        };

        result.latency = started.elapsed();
        result.bytes_in = bytes_in;
        if !status.is_success() {
            result.error = status_error(target, status);
        } else if let (Some(expected), Some(hasher)) = (expected_md5, hasher) {
            let actual = format!("{:x}", hasher.finalize());
            if actual != expected {
                result.code = VALIDATION_FAILED_CODE;
                result.error = format!(
                    "{} {}: MD5 not matched (expected {}, got {})",
                    target.method, target.url, expected, actual
                );
            }
        }
        result
    }
}

async fn read_body(response: Response, mut digest: Option<&mut Md5>) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
        if let Some(hasher) = digest.as_deref_mut() {
            hasher.update(&bytes);
        }
    }
    Ok(total_bytes)
}

fn outbound_length(request: &Request) -> u64 {
    if let Some(bytes) = request.body().and_then(reqwest::Body::as_bytes) {
        return u64::try_from(bytes.len()).unwrap_or(u64::MAX);
    }
    request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

fn status_error(target: &Target, status: StatusCode) -> String {
    format!("{} {}: {}", target.method, target.url, status)
}

/// `reqwest` keeps the interesting part (refused, timed out, bad cert) in
/// the source chain.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        if write!(message, ": {}", cause).is_err() {
            break;
        }
        source = cause.source();
    }
    message
}
