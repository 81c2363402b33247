pub mod http;

/// Probe-level failures are domain outcomes, not faults: they end up as
/// report text inside a normal 200 response, never as server errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    Timeout,
    Connection,
    Unexpected(String),
}

/// Outcome of a single outbound GET. Lives only for the duration of one
/// check invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub status: Option<u16>,
    pub elapsed_ms: Option<f64>,
    pub failure: Option<ProbeFailure>,
}

impl ProbeResult {
    pub fn responded(status: u16, elapsed_ms: f64) -> Self {
        Self {
            status: Some(status),
            elapsed_ms: Some(elapsed_ms),
            failure: None,
        }
    }

    pub fn failed(failure: ProbeFailure) -> Self {
        Self {
            status: None,
            elapsed_ms: None,
            failure: Some(failure),
        }
    }
}
