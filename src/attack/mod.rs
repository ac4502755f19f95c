//! Attack engine: a configured client plus the fixed-rate and
//! fixed-concurrency schedulers that drive attempts against a target set.
mod client;
mod concurrency;
mod hit;
mod rate;

#[cfg(test)]
mod test_support;

use std::net::IpAddr;
use std::time::Duration;

use reqwest::Client;

use crate::error::AppResult;

pub const DEFAULT_REDIRECTS: usize = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AttackerConfig {
    /// Redirects followed before the attempt fails.
    pub redirects: usize,
    /// Applied to connecting (TLS included) and to waiting for response headers.
    pub timeout: Duration,
    /// Local address outgoing connections bind to.
    pub local_addr: Option<IpAddr>,
}

impl Default for AttackerConfig {
    fn default() -> Self {
        Self {
            redirects: DEFAULT_REDIRECTS,
            timeout: DEFAULT_TIMEOUT,
            local_addr: None,
        }
    }
}

/// Owns one HTTP client shared by every attempt of its attacks.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct Attacker {
    client: Client,
    timeout: Duration,
}

impl Attacker {
    /// Builds an attacker from `config`.
    ///
    /// Certificate verification is disabled so self-signed endpoints can be
    /// tested. Proxy settings are taken from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: &AttackerConfig) -> AppResult<Self> {
        Ok(Self {
            client: client::build_client(config)?,
            timeout: config.timeout,
        })
    }
}

/// Up-front result reservation; larger runs grow the vector as they go.
const MAX_PREALLOCATED_RESULTS: usize = 65_536;

fn result_capacity(planned: u64) -> usize {
    usize::try_from(planned)
        .unwrap_or(usize::MAX)
        .min(MAX_PREALLOCATED_RESULTS)
}
