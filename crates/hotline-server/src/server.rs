//! `HotlineServer` — the axum HTTP gateway.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use hotline_core::{CallerId, Turn};
use hotline_session::TurnProcessor;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::twiml;

/// Shared state accessible from axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The call-session state machine.
    pub processor: Arc<TurnProcessor>,
    /// Handle for rendering `/metrics`.
    pub metrics: PrometheusHandle,
}

/// The inbound gateway server.
pub struct HotlineServer {
    processor: Arc<TurnProcessor>,
    metrics: PrometheusHandle,
}

impl HotlineServer {
    /// Create a new server around an already-wired processor.
    pub fn new(processor: Arc<TurnProcessor>, metrics: PrometheusHandle) -> Self {
        Self { processor, metrics }
    }

    /// Build the axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            processor: self.processor.clone(),
            metrics: self.metrics.clone(),
        };

        Router::new()
            .route("/voice", get(voice_handler))
            .route("/check", get(check_handler))
            .route("/metrics", get(metrics_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

/// Query parameters of the provider's per-keypress callback.
///
/// Field names match the provider's wire casing. `Digits` is absent on the
/// opening callback of a call.
#[derive(Debug, Deserialize)]
pub struct VoiceQuery {
    /// The caller's number.
    #[serde(rename = "Caller")]
    caller: Option<String>,
    /// What the caller keyed in, if anything.
    #[serde(rename = "Digits")]
    digits: Option<String>,
}

/// GET /voice
async fn voice_handler(State(state): State<AppState>, Query(query): Query<VoiceQuery>) -> Response {
    // The provider always sends Caller; a missing one is not a turn.
    let Some(caller) = query.caller.filter(|c| !c.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, "missing Caller").into_response();
    };

    let turn = Turn::new(CallerId::from_number(&caller), query.digits);
    debug!(caller = %turn.caller, keypress = ?turn.keypress, "voice callback");

    let directive = state.processor.process(turn).await;
    let body = twiml::render(&directive);
    ([(header::CONTENT_TYPE, "text/xml")], body).into_response()
}

/// GET /check
async fn check_handler() -> &'static str {
    "Status check: OK"
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> String {
    crate::metrics::render(&state.metrics)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use hotline_core::GameMessage;
    use hotline_relay::{GameConnector, RelayError, RelayHandle};
    use hotline_session::SessionRegistry;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use parking_lot::Mutex;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use super::*;

    /// Connector fake: hands out channel-backed handles and keeps the
    /// receiver ends alive so the handles stay open.
    #[derive(Default)]
    struct FakeConnector {
        receivers: Mutex<Vec<mpsc::Receiver<GameMessage>>>,
    }

    #[async_trait]
    impl GameConnector for FakeConnector {
        async fn connect(&self, _caller: &CallerId) -> Result<RelayHandle, RelayError> {
            let (tx, rx) = mpsc::channel(32);
            self.receivers.lock().push(rx);
            Ok(RelayHandle::from_parts(tx, CancellationToken::new()))
        }
    }

    fn make_server() -> HotlineServer {
        let registry = Arc::new(SessionRegistry::new());
        let processor = Arc::new(TurnProcessor::new(
            registry,
            Arc::new(FakeConnector::default()),
        ));
        // Local handle, not globally installed, to avoid test conflicts.
        let handle = PrometheusBuilder::new().build_recorder().handle();
        HotlineServer::new(processor, handle)
    }

    async fn fetch(app: Router, uri: &str) -> Response {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(req).await.unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn check_endpoint_reports_ok() {
        let resp = fetch(make_server().router(), "/check").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "Status check: OK");
    }

    #[tokio::test]
    async fn voice_without_caller_is_a_bad_request() {
        let resp = fetch(make_server().router(), "/voice?Digits=2").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn opening_callback_renders_get_ready_twiml() {
        let resp = fetch(make_server().router(), "/voice?Caller=%2B15550001234").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/xml"
        );

        let body = body_text(resp).await;
        assert!(body.contains("<Say>Get ready!</Say>"));
        assert!(body.contains("<Say>Enter your game pin.</Say>"));
    }

    #[tokio::test]
    async fn code_then_move_flow_over_http() {
        let app = make_server().router();

        let set = fetch(app.clone(), "/voice?Caller=%2B1555&Digits=1234").await;
        let set_body = body_text(set).await;
        assert!(set_body.contains("Setting your game code to 1 2 3 4."));

        let mv = fetch(app.clone(), "/voice?Caller=%2B1555&Digits=2").await;
        let mv_body = body_text(mv).await;
        assert!(mv_body.contains("<Say>Moving UP</Say>"));
        assert!(mv_body.contains("<Say>Choose your next move.</Say>"));

        let cancel = fetch(app, "/voice?Caller=%2B1555&Digits=*").await;
        let cancel_body = body_text(cancel).await;
        assert!(cancel_body.contains("<Say>Removing your game session!</Say><Hangup/>"));
    }

    #[tokio::test]
    async fn empty_digits_is_treated_as_no_keypress() {
        let app = make_server().router();
        let resp = fetch(app, "/voice?Caller=%2B1555&Digits=").await;
        let body = body_text(resp).await;
        assert!(body.contains("<Say>Get ready!</Say>"));
    }

    #[tokio::test]
    async fn metrics_endpoint_renders() {
        let resp = fetch(make_server().router(), "/metrics").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let resp = fetch(make_server().router(), "/nonexistent").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
