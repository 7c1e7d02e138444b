//! Prometheus metrics and the `/metrics` exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const DURATION_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct ServiceMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    checkouts_total: IntCounterVec,
    order_revenue_total: IntCounter,
    order_discount_total: IntCounter,
}

static SERVICE_METRICS: OnceLock<Option<ServiceMetrics>> = OnceLock::new();

/// Keeps the in-flight gauge raised for as long as it lives.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let Some(metrics) = metrics() else {
            return Self { tracked: false };
        };

        metrics.requests_in_flight.inc();

        Self { tracked: true }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code_label = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[
            method,
            route,
            status_class(status_code),
            status_code_label.as_str(),
        ])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a checkout attempt by outcome: `placed` or the error code returned.
pub(crate) fn observe_checkout(outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics.checkouts_total.with_label_values(&[outcome]).inc();
    }
}

/// Add a placed order's charged total and discount, in minor units.
pub(crate) fn observe_order(total: u64, discount: u64) {
    if let Some(metrics) = metrics() {
        metrics.order_revenue_total.inc_by(total);
        metrics.order_discount_total.inc_by(discount);
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn metrics() -> Option<&'static ServiceMetrics> {
    SERVICE_METRICS.get_or_init(build_metrics).as_ref()
}

/// Register a freshly built collector, logging and discarding it on failure.
fn register<C>(registry: &Registry, name: &str, built: prometheus::Result<C>) -> Option<C>
where
    C: Collector + Clone + 'static,
{
    let collector = built
        .inspect_err(|source| error!(metric = name, "failed to create metric: {source}"))
        .ok()?;

    registry
        .register(Box::new(collector.clone()))
        .inspect_err(|source| error!(metric = name, "failed to register metric: {source}"))
        .ok()?;

    Some(collector)
}

fn build_metrics() -> Option<ServiceMetrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        "requests_total",
        IntCounterVec::new(
            Opts::new(
                "sweetcart_json_http_requests_total",
                "HTTP requests by method, route, status class and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        ),
    )?;

    let request_duration_seconds = register(
        &registry,
        "request_duration_seconds",
        HistogramVec::new(
            HistogramOpts::new(
                "sweetcart_json_http_request_duration_seconds",
                "HTTP request duration in seconds by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        ),
    )?;

    let requests_in_flight = register(
        &registry,
        "requests_in_flight",
        IntGauge::with_opts(Opts::new(
            "sweetcart_json_http_requests_in_flight",
            "HTTP requests currently being served.",
        )),
    )?;

    let checkouts_total = register(
        &registry,
        "checkouts_total",
        IntCounterVec::new(
            Opts::new(
                "sweetcart_checkouts_total",
                "Checkout attempts by outcome.",
            ),
            &["outcome"],
        ),
    )?;

    let order_revenue_total = register(
        &registry,
        "order_revenue_total",
        IntCounter::with_opts(Opts::new(
            "sweetcart_order_revenue_minor_units_total",
            "Sum of placed order totals in minor units.",
        )),
    )?;

    let order_discount_total = register(
        &registry,
        "order_discount_total",
        IntCounter::with_opts(Opts::new(
            "sweetcart_order_discount_minor_units_total",
            "Sum of discounts granted on placed orders in minor units.",
        )),
    )?;

    Some(ServiceMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        checkouts_total,
        order_revenue_total,
        order_discount_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
