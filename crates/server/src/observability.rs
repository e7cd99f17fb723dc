use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter_vec, register_int_gauge, Encoder, IntCounterVec, IntGauge, TextEncoder,
};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "movie_api_requests_total",
        "Movie API requests by operation and response status",
        &["operation", "status"]
    )
    .expect("register requests_total")
});

pub static MOVIES: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("movie_api_movies", "Movies currently held in the store")
        .expect("register movies gauge")
});

pub fn record(operation: &str, status: StatusCode) {
    REQUESTS_TOTAL
        .with_label_values(&[operation, status.as_str()])
        .inc();
}

pub fn set_movie_count(count: usize) {
    MOVIES.set(i64::try_from(count).unwrap_or(i64::MAX));
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_requests_show_up_in_exposition() {
        record("list", StatusCode::OK);
        set_movie_count(10);
        let (status, text) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(text.contains("movie_api_requests_total"));
        assert!(text.contains("operation=\"list\""));
        assert!(text.contains("movie_api_movies"));
    }
}
