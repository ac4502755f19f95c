use std::time::Duration;

use reqwest::{Client, redirect};
use tracing::error;

use crate::error::{AppError, AppResult, HttpError};

use super::AttackerConfig;

const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

pub(super) fn build_client(config: &AttackerConfig) -> AppResult<Client> {
    let max_redirects = config.redirects;
    let redirect_policy = redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            attempt.error(format!("stopped after {} redirects", max_redirects))
        } else {
            attempt.follow()
        }
    });

    let client_builder = Client::builder()
        .connect_timeout(config.timeout)
        .tcp_keepalive(TCP_KEEPALIVE)
        .redirect(redirect_policy)
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .local_address(config.local_addr);

    match client_builder.build() {
        Ok(client) => Ok(client),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            Err(AppError::http(HttpError::BuildClientFailed { source: e }))
        }
    }
}
