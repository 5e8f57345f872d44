/*!
 * Monitoring
 * Structured logging setup and scan spans
 */

mod tracer;

pub use tracer::{init_tracing, span_scan, ScanSpan};
