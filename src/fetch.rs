use std::time::{Duration, Instant};

use reqwest::header::{CONNECTION, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, error};

use crate::error::CheckError;
use crate::model::CheckResponse;

/// User-agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "VGT MnM ApiCheck/1.0";

/// Parameters for the single request of a check run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub url: String,
    /// When false, certificate validation is skipped entirely.
    pub verify_tls: bool,
    /// Covers connect, TLS handshake, headers and body.
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

/// Result of issuing the request, with the wall-clock time it took either way.
#[derive(Debug)]
pub struct Fetched {
    pub elapsed: Duration,
    pub response: Result<reqwest::Response, CheckError>,
}

fn build_client(opts: &FetchOptions) -> Result<reqwest::Client, CheckError> {
    let user_agent = match opts.user_agent.as_deref() {
        Some(ua) if !ua.is_empty() => ua,
        _ => DEFAULT_USER_AGENT,
    };

    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(opts.timeout)
        // one-shot connection: nothing is kept around for reuse
        .pool_max_idle_per_host(0)
        .no_proxy()
        .danger_accept_invalid_certs(!opts.verify_tls)
        .build()
        .map_err(CheckError::Client)
}

/// Issue one GET request. No retries.
pub async fn fetch(opts: &FetchOptions) -> Fetched {
    let start = Instant::now();
    let response = match build_client(opts) {
        Ok(client) => client
            .get(&opts.url)
            .header(CONNECTION, HeaderValue::from_static("close"))
            .send()
            .await
            .map_err(CheckError::from),
        Err(e) => Err(e),
    };

    Fetched {
        elapsed: start.elapsed(),
        response,
    }
}

/// Fetch the URL and decode the payload into a finished `CheckResponse`.
///
/// The body is only read and decoded on a 200; any other status is recorded
/// as is. Transport, body and decode failures end up in `err`.
pub async fn probe(opts: FetchOptions) -> CheckResponse {
    let mut cr = CheckResponse::new(&opts.url);

    debug!(url = %opts.url, timeout = ?opts.timeout, "issuing request");
    let fetched = fetch(&opts).await;
    cr.response_time = fetched.elapsed;

    let resp = match fetched.response {
        Ok(resp) => resp,
        Err(e) => {
            error!("{e}");
            cr.err = Some(e);
            return cr;
        }
    };

    cr.http_code = resp.status().as_u16();
    debug!(status = cr.http_code, elapsed = ?cr.response_time, "response received");
    if resp.status() != StatusCode::OK {
        return cr;
    }

    match resp.bytes().await {
        Ok(body) => cr.body = body.to_vec(),
        Err(e) => {
            let e = CheckError::Body(e);
            error!("{e}");
            cr.err = Some(e);
            return cr;
        }
    }

    if let Err(e) = cr.decode_body() {
        error!("{e}");
        cr.err = Some(e);
    }

    cr
}
