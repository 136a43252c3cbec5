//! Metric recording helpers, organized by phase.
//!
//! Names follow Prometheus conventions with a `tg_` prefix. The `metrics`
//! facade is a no-op unless a recorder is installed, so these are safe to
//! call from library code and tests alike.

pub mod email {
    pub fn sent() {
        metrics::counter!("tg_email_sent_total").increment(1);
    }

    pub fn blocked_sender() {
        metrics::counter!("tg_email_blocked_sender_total").increment(1);
    }

    pub fn skipped_unsafe_body() {
        metrics::counter!("tg_email_skipped_unsafe_body_total").increment(1);
    }

    pub fn blocked_placeholder_config() {
        metrics::counter!("tg_email_blocked_placeholder_config_total").increment(1);
    }
}

pub mod jobs {
    pub fn entities_seen(job: &'static str, count: usize) {
        metrics::counter!("tg_jobs_entities_seen_total", "job" => job).increment(count as u64);
    }

    pub fn entities_updated(job: &'static str, count: usize) {
        metrics::counter!("tg_jobs_entities_updated_total", "job" => job).increment(count as u64);
    }

    pub fn entity_errors(job: &'static str, count: usize) {
        metrics::counter!("tg_jobs_entity_errors_total", "job" => job).increment(count as u64);
    }
}

pub mod calculations {
    pub fn run(calculation_id: &str) {
        metrics::counter!("tg_calculations_runs_total", "calculation" => calculation_id.to_string())
            .increment(1);
    }

    pub fn batch_size(count: usize) {
        metrics::histogram!("tg_calculations_batch_size").record(count as f64);
    }
}
