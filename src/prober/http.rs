use anyhow::Result;
use reqwest::Client;
use tokio::time::{Duration, Instant};

use super::{ProbeFailure, ProbeResult};

/// Total budget for the outbound GET, including reading the body.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed browser-like User-Agent; some exam platforms reject unknown clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(PROBE_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Issue one GET against `url` and measure wall-clock latency until the
/// body has been read, matching what a browser-side load would see.
pub async fn probe_http(client: &Client, url: &str) -> ProbeResult {
    let start = Instant::now();
    let resp = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => return ProbeResult::failed(classify_error(&e)),
    };
    let status = resp.status().as_u16();
    if let Err(e) = resp.bytes().await {
        return ProbeResult::failed(classify_error(&e));
    }
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    ProbeResult::responded(status, elapsed_ms)
}

fn classify_error(e: &reqwest::Error) -> ProbeFailure {
    if e.is_timeout() {
        ProbeFailure::Timeout
    } else if e.is_connect() {
        ProbeFailure::Connection
    } else {
        ProbeFailure::Unexpected(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use warp::Filter;

    #[tokio::test]
    async fn refused_connection_is_a_connection_failure() {
        // Bind then drop, so the port is closed when the probe runs.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = build_client().unwrap();
        let result = probe_http(&client, &format!("http://{addr}/")).await;
        assert_eq!(result.failure, Some(ProbeFailure::Connection));
        assert_eq!(result.status, None);
    }

    #[tokio::test]
    async fn responding_server_yields_status_and_latency() {
        let route = warp::any().map(|| "ok");
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        let client = build_client().unwrap();
        let result = probe_http(&client, &format!("http://{addr}/")).await;
        assert_eq!(result.status, Some(200));
        assert!(result.elapsed_ms.unwrap() >= 0.0);
        assert_eq!(result.failure, None);
    }
}
