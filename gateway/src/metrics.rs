//! Prometheus metrics for the gateway.
//!
//! [`GatewayMetrics`] owns a dedicated [`Registry`] that `GET /metrics`
//! encodes into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

pub struct GatewayMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub petitions_created: IntCounter,
    pub signatures_recorded: IntCounter,
    /// Proofs the cloud verifier accepted.
    pub proofs_accepted: IntCounter,
    /// Proofs the cloud verifier rejected.
    pub proofs_rejected: IntCounter,
    /// Client-reported verify errors answered without an upstream call.
    pub proofs_short_circuited: IntCounter,
    pub actions_registered: IntCounter,
    pub action_failures: IntCounter,
    pub wallet_logins: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Petitions seen by the last list or create.
    pub petition_count: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Round-trip time of cloud proof verification, in milliseconds.
    pub verify_latency_ms: Histogram,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let petitions_created = register_int_counter_with_registry!(
            Opts::new("petition_created_total", "Petitions created"),
            registry
        )?;
        let signatures_recorded = register_int_counter_with_registry!(
            Opts::new("petition_signatures_total", "Signatures recorded"),
            registry
        )?;
        let proofs_accepted = register_int_counter_with_registry!(
            Opts::new("petition_proofs_accepted_total", "Proofs accepted by World ID"),
            registry
        )?;
        let proofs_rejected = register_int_counter_with_registry!(
            Opts::new("petition_proofs_rejected_total", "Proofs rejected by World ID"),
            registry
        )?;
        let proofs_short_circuited = register_int_counter_with_registry!(
            Opts::new(
                "petition_proofs_client_error_total",
                "Verify payloads carrying a client-side error"
            ),
            registry
        )?;
        let actions_registered = register_int_counter_with_registry!(
            Opts::new("petition_actions_registered_total", "Actions registered"),
            registry
        )?;
        let action_failures = register_int_counter_with_registry!(
            Opts::new(
                "petition_action_failures_total",
                "Action registrations that failed upstream"
            ),
            registry
        )?;
        let wallet_logins = register_int_counter_with_registry!(
            Opts::new("petition_wallet_logins_total", "Successful wallet sign-ins"),
            registry
        )?;

        let petition_count = register_int_gauge_with_registry!(
            Opts::new("petition_count", "Current number of stored petitions"),
            registry
        )?;

        // 1 ms → ~16 s.
        let verify_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "petition_verify_latency_ms",
                "Cloud proof verification latency in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(1.0, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            petitions_created,
            signatures_recorded,
            proofs_accepted,
            proofs_rejected,
            proofs_short_circuited,
            actions_registered,
            action_failures,
            wallet_logins,
            petition_count,
            verify_latency_ms,
        })
    }

    /// Encode every metric in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_registered_metrics() {
        let m = GatewayMetrics::new().unwrap();
        m.petitions_created.inc();
        m.petition_count.set(4);
        let text = m.encode().unwrap();
        assert!(text.contains("petition_created_total 1"));
        assert!(text.contains("petition_count 4"));
    }

    #[test]
    fn registries_are_independent() {
        let a = GatewayMetrics::new().unwrap();
        let b = GatewayMetrics::new().unwrap();
        a.signatures_recorded.inc();
        assert_eq!(b.signatures_recorded.get(), 0);
    }
}
