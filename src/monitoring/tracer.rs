/*!
 * Structured Tracing
 * Subscriber setup and spans for pool scans using the tracing crate
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Scans slower than this are reported at warn level
const SLOW_SCAN_MS: u128 = 50;

static NEXT_SCAN_ID: AtomicU64 = AtomicU64::new(1);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - STMT_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("STMT_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Span covering one full pass over the pool
pub struct ScanSpan {
    span: tracing::Span,
    start: Instant,
    scan_id: u64,
    rows: usize,
    skipped: usize,
}

impl ScanSpan {
    pub fn new(table: &str) -> Self {
        let scan_id = NEXT_SCAN_ID.fetch_add(1, Ordering::Relaxed);

        let span = span!(
            Level::DEBUG,
            "scan",
            scan_id = scan_id,
            table = table,
            rows = tracing::field::Empty,
            skipped = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            scan_id,
            rows: 0,
            skipped: 0,
        }
    }

    pub fn scan_id(&self) -> u64 {
        self.scan_id
    }

    /// Count a returned row
    pub fn record_row(&mut self) {
        self.rows += 1;
    }

    /// Count a slot that was caught mid-write
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Drop for ScanSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("rows", self.rows);
        self.span.record("skipped", self.skipped);
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();

        if duration.as_millis() > SLOW_SCAN_MS {
            warn!(
                scan_id = self.scan_id,
                rows = self.rows,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow scan detected"
            );
        } else {
            debug!(
                scan_id = self.scan_id,
                rows = self.rows,
                skipped = self.skipped,
                "scan completed"
            );
        }
    }
}

/// Helper to open a scan span
#[inline]
pub fn span_scan(table: &str) -> ScanSpan {
    ScanSpan::new(table)
}
