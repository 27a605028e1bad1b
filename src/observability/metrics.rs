use prometheus::core::Collector;
use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub orders_in_queue: IntGauge,
    pub orders_processed_total: IntCounterVec,
    pub order_preparation_seconds: Histogram,
    pub sales_amount_total: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        Self {
            orders_in_queue: register(
                &registry,
                IntGauge::new("orders_in_queue", "Current number of pending orders"),
            ),
            orders_processed_total: register(
                &registry,
                IntCounterVec::new(
                    Opts::new("orders_processed_total", "Processed orders by outcome"),
                    &["outcome"],
                ),
            ),
            order_preparation_seconds: register(
                &registry,
                Histogram::with_opts(HistogramOpts::new(
                    "order_preparation_seconds",
                    "Wall time from dequeue to bill in seconds",
                )),
            ),
            sales_amount_total: register(
                &registry,
                Gauge::new(
                    "sales_amount_total",
                    "Sum of bill totals charged by this process",
                ),
            ),
            registry,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

/// Registers a freshly built collector and hands back the caller's handle.
///
/// Metric names are static, so construction and registration cannot fail.
fn register<C>(registry: &Registry, collector: prometheus::Result<C>) -> C
where
    C: Collector + Clone + 'static,
{
    let collector = collector.expect("valid metric definition");
    registry
        .register(Box::new(collector.clone()))
        .expect("metric names are unique");
    collector
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
