//! Prometheus counters for the rules API.
//!
//! Registered against the default registry, which the admin `/metrics`
//! endpoint encodes in text format.

/// Process-wide counters.
pub mod counters {
    use prometheus::{IntCounter, Opts};
    use std::sync::OnceLock;
    use tracing::warn;

    fn make_counter(name: &str, help: &str) -> IntCounter {
        let counter = IntCounter::with_opts(Opts::new(name, help)).expect("static counter opts");
        if let Err(err) = prometheus::default_registry().register(Box::new(counter.clone())) {
            warn!(name = %name, error = %err, "failed to register counter");
        }
        counter
    }

    // ========================================================================
    // RULE LIFECYCLE
    // ========================================================================

    static RULES_CREATED: OnceLock<IntCounter> = OnceLock::new();
    static RULES_UPDATED: OnceLock<IntCounter> = OnceLock::new();
    static RULES_DELETED: OnceLock<IntCounter> = OnceLock::new();

    pub fn rules_created() -> &'static IntCounter {
        RULES_CREATED.get_or_init(|| {
            make_counter("limitd_rules_created_total", "Configurations created")
        })
    }

    pub fn rules_updated() -> &'static IntCounter {
        RULES_UPDATED.get_or_init(|| {
            make_counter("limitd_rules_updated_total", "Configurations replaced")
        })
    }

    pub fn rules_deleted() -> &'static IntCounter {
        RULES_DELETED.get_or_init(|| {
            make_counter("limitd_rules_deleted_total", "Configurations deleted")
        })
    }

    // ========================================================================
    // VALIDATION OUTCOMES
    // ========================================================================

    static VALIDATION_FAILURES: OnceLock<IntCounter> = OnceLock::new();
    static BUILD_FAILURES: OnceLock<IntCounter> = OnceLock::new();
    static QUOTA_REJECTIONS: OnceLock<IntCounter> = OnceLock::new();

    pub fn validation_failures() -> &'static IntCounter {
        VALIDATION_FAILURES.get_or_init(|| {
            make_counter(
                "limitd_validation_failures_total",
                "Requests rejected by envelope validation",
            )
        })
    }

    pub fn build_failures() -> &'static IntCounter {
        BUILD_FAILURES.get_or_init(|| {
            make_counter(
                "limitd_build_failures_total",
                "Requests rejected by expression compilation",
            )
        })
    }

    pub fn quota_rejections() -> &'static IntCounter {
        QUOTA_REJECTIONS.get_or_init(|| {
            make_counter(
                "limitd_quota_rejections_total",
                "Requests rejected by plan quota",
            )
        })
    }

    // ========================================================================
    // GATEWAY SIGNALLING
    // ========================================================================

    static GATEWAY_PURGES: OnceLock<IntCounter> = OnceLock::new();

    pub fn gateway_purges() -> &'static IntCounter {
        GATEWAY_PURGES.get_or_init(|| {
            make_counter(
                "limitd_gateway_purges_total",
                "Cache invalidation signals sent to the gateway",
            )
        })
    }
}
