//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

/// HTTP request metrics, exposed at `/metrics`.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .expect("metrics builder")
});

/// Simulation metrics, exposed at `/api/metrics/sim`.
pub static SIM_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

fn register<C: prometheus::core::Collector + Clone + 'static>(c: C) -> C {
    if let Err(e) = SIM_REGISTRY.register(Box::new(c.clone())) {
        log::warn!("metric registration failed: {e}");
    }
    c
}

pub static TICKS: Lazy<IntCounter> = Lazy::new(|| {
    register(IntCounter::new("sim_ticks_total", "Simulation ticks run").expect("counter"))
});

pub static TICK_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    let opts = HistogramOpts::new("sim_tick_seconds", "Wall time spent per tick")
        .buckets(vec![0.0001, 0.0005, 0.001, 0.002, 0.005, 0.01, 0.0167, 0.05]);
    register(Histogram::with_opts(opts).expect("histogram"))
});

pub static ROOMS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    register(IntGauge::new("sim_rooms_active", "Live match rooms").expect("gauge"))
});

pub static ENTITIES: Lazy<IntGauge> = Lazy::new(|| {
    register(IntGauge::new("sim_entities", "Entities after the latest tick").expect("gauge"))
});

pub static BROADCAST_DROPS: Lazy<IntCounter> = Lazy::new(|| {
    register(
        IntCounter::new(
            "sim_broadcast_drops_total",
            "Outbound frames dropped for slow or closed connections",
        )
        .expect("counter"),
    )
});

/// Render the simulation registry in the text exposition format.
pub fn render_sim() -> anyhow::Result<String> {
    let mut out = String::new();
    TextEncoder::new().encode_utf8(&SIM_REGISTRY.gather(), &mut out)?;
    Ok(out)
}
