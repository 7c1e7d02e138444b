//! Request-level logging and request IDs.

mod request_ids;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, error, info, warn};

use crate::auth::middleware::USER_UUID_HEADER;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// What the completion log lines say about a request.
struct RequestSummary {
    request_id: String,
    method: String,
    path: String,
    route: String,
}

impl RequestSummary {
    fn log_completion(&self, status: StatusCode, duration_ms: u128, threshold_ms: Option<u128>) {
        let status = status.as_u16();

        info!(status, duration_ms, "request.completed");

        match status {
            500.. => error!(
                status,
                method = %self.method,
                path = %self.path,
                request_id = %self.request_id,
                "server error response"
            ),
            400..500 => warn!(
                status,
                method = %self.method,
                path = %self.path,
                request_id = %self.request_id,
                "client error response"
            ),
            _ => {}
        }

        if let Some(threshold_ms) = threshold_ms
            && duration_ms > threshold_ms
        {
            warn!(
                method = %self.method,
                route = %self.route,
                request_id = %self.request_id,
                duration_ms,
                threshold_ms,
                "slow request detected"
            );
        }
    }
}

/// Assign a request id, open the `http.request` span and record the outcome.
///
/// The user identity header is logged as sent; the auth middleware decides
/// whether it is valid.
#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    request_ids::set_request_id_header(res, &request_id);

    let path = req.uri().path().to_owned();

    let summary = RequestSummary {
        request_id,
        method: req.method().to_string(),
        route: spans::normalise_path(&path),
        path,
    };

    let user_uuid = req.header::<String>(USER_UUID_HEADER).unwrap_or_default();
    let remote_addr = req.remote_addr().to_string();
    let _in_flight_request = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        request_id = %summary.request_id,
        method = %summary.method,
        path = %summary.path,
        route = %summary.route,
        user_uuid = %user_uuid,
        remote_addr = %remote_addr,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let duration = started.elapsed();
    let status = request_ids::response_status_or_ok(res.status_code);
    let duration_ms = duration.as_millis();

    metrics::observe_request(
        &summary.method,
        &summary.route,
        status.as_u16(),
        duration.as_secs_f64(),
    );

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        summary.log_completion(
            status,
            duration_ms,
            settings::slow_request_threshold_ms().map(u128::from),
        );
    });
}
