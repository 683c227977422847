//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Conversions (count, duration, payload sizes)
//! - Failures by pipeline stage
//! - Remote input fetches

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Conversions total by output format and result.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("forgeline_conversions_total", "Total conversions"),
        &["format", "result"], // result: "success", "failed"
    )
    .unwrap()
});

/// Conversion duration in seconds by output format.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "forgeline_conversion_duration_seconds",
            "Duration of conversions",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["format"],
    )
    .unwrap()
});

/// Conversion failures by pipeline stage.
pub static CONVERSION_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("forgeline_conversion_failures_total", "Failed conversions"),
        &["stage"], // "acquisition", "process", "duration_parse", "filesystem"
    )
    .unwrap()
});

/// Input payload sizes in bytes.
pub static INPUT_BYTES: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("forgeline_input_bytes", "Size of resolved input payloads").buckets(
            vec![
                1024.0,
                16384.0,
                262144.0,
                1048576.0,
                10485760.0,
                104857600.0,
            ],
        ),
        &["source"], // "upload", "base64", "url"
    )
    .unwrap()
});

/// Output payload sizes in bytes.
pub static OUTPUT_BYTES: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("forgeline_output_bytes", "Size of transcoded payloads").buckets(vec![
            1024.0,
            16384.0,
            262144.0,
            1048576.0,
            10485760.0,
            104857600.0,
        ]),
        &["format"],
    )
    .unwrap()
});

/// Remote input fetches by status.
pub static REMOTE_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("forgeline_remote_fetches_total", "Remote input downloads"),
        &["status"], // "success", "error"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        Box::new(CONVERSION_FAILURES.clone()),
        Box::new(INPUT_BYTES.clone()),
        Box::new(OUTPUT_BYTES.clone()),
        Box::new(REMOTE_FETCHES.clone()),
    ]
}
