/*
    Metrics - discovery and send pipeline metrics for monitoring

    Provides counters and histograms for:
    - SMP lookups (direct vs wildcard, success vs failure)
    - Send attempts and outcomes
    - Attachment packaging volume

    Metrics can be exported via Prometheus or other backends configured by
    the embedding application.
*/

use metrics::{counter, describe_counter, describe_histogram, histogram};

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    describe_counter!(
        "courier_smp_lookups_total",
        "Total number of SMP lookups performed, labeled by path (direct, wildcard) and result (resolved, no_endpoint, error)"
    );

    describe_counter!(
        "courier_sends_total",
        "Total number of terminal send attempts, labeled by result (sent, configuration, discovery, transport, wrapped)"
    );

    describe_counter!(
        "courier_attachments_packaged_total",
        "Total number of attachment parts packaged for transport"
    );

    describe_histogram!(
        "courier_attachment_bytes",
        "Size in bytes of packaged attachment parts"
    );

    describe_histogram!(
        "courier_send_duration_seconds",
        "Duration of the full send-and-await-signal round trip"
    );
}

/// Record an SMP lookup outcome
pub fn smp_lookup(path: &'static str, result: &'static str) {
    counter!("courier_smp_lookups_total", "path" => path, "result" => result).increment(1);
}

/// Record a terminal send outcome
pub fn send_result(result: &'static str) {
    counter!("courier_sends_total", "result" => result).increment(1);
}

/// Record a packaged attachment part
pub fn attachment_packaged(size: usize) {
    counter!("courier_attachments_packaged_total").increment(1);
    histogram!("courier_attachment_bytes").record(size as f64);
}

/// Record send round-trip duration
pub fn send_duration(duration_secs: f64) {
    histogram!("courier_send_duration_seconds").record(duration_secs);
}
