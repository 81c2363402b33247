use once_cell::sync::Lazy;
use prometheus::{Encoder, Gauge, IntCounterVec, Opts, Registry, TextEncoder};
use warp::Filter;

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

static CHECK_COUNTER: Lazy<IntCounterVec> = Lazy::new(|| {
    let opts = Opts::new("status_checks_total", "Total number of URL checks by outcome");
    let ctr = IntCounterVec::new(opts, &["outcome"]).unwrap();
    REGISTRY.register(Box::new(ctr.clone())).unwrap();
    ctr
});

// Gauge rather than a per-target series: the probed URL is caller supplied
// and would blow up label cardinality.
static LATENCY_GAUGE: Lazy<Gauge> = Lazy::new(|| {
    let opts = Opts::new(
        "probe_latency_milliseconds_current",
        "Latency of the most recent probe in milliseconds",
    );
    let gauge = Gauge::with_opts(opts).unwrap();
    REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

pub fn observe_check(outcome: &str, latency_ms: Option<f64>) {
    CHECK_COUNTER.with_label_values(&[outcome]).inc();
    if let Some(ms) = latency_ms {
        LATENCY_GAUGE.set(ms);
    }
}

pub fn metrics_route()
-> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("metrics").and(warp::get()).map(|| {
        let encoder = TextEncoder::new();
        let mf = REGISTRY.gather();
        let mut buf = Vec::new();
        encoder.encode(&mf, &mut buf).unwrap();
        warp::http::Response::builder()
            .header("Content-Type", encoder.format_type())
            .body(buf)
            .unwrap()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn metrics_endpoint_exposes_check_counters() {
        observe_check("fast", Some(123.0));
        let resp = warp::test::request()
            .method("GET")
            .path("/metrics")
            .reply(&metrics_route())
            .await;
        assert_eq!(resp.status(), 200);
        let body = String::from_utf8_lossy(resp.body());
        assert!(body.contains("status_checks_total"));
        assert!(body.contains("probe_latency_milliseconds_current"));
    }
}
