//! Metrics 模块
//!
//! 提供 Prometheus metrics 导出和 HTTP 请求指标

use std::time::Instant;

use axum::{
    Router,
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusHandle;
use taproom_telemetry::init_metrics;
use tracing::warn;

/// Metrics 记录器
#[derive(Clone)]
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    /// 安装全局 Prometheus recorder
    ///
    /// 已经安装过时返回 `None`，指标仍会写入先前的 recorder
    pub fn install() -> Option<Self> {
        match init_metrics() {
            Ok(handle) => Some(Self { handle }),
            Err(e) => {
                warn!(error = %e, "Failed to install Prometheus recorder, /metrics disabled");
                None
            }
        }
    }

    /// 获取 Prometheus 格式的 metrics
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// `GET /metrics`
    pub fn routes(self) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(self)
    }
}

/// 记录 HTTP 请求
pub fn record_http_request(method: &str, path: &str, status: u16, duration_ms: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_ms", &labels).record(duration_ms);
}

/// 请求指标中间件
///
/// 需要通过 `route_layer` 挂载才能拿到路由模板，否则退回原始路径
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => req.uri().path().to_string(),
    };

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64() * 1000.0;
    record_http_request(&method, &path, response.status().as_u16(), duration);

    response
}

/// Metrics 端点处理器
async fn metrics_handler(State(recorder): State<MetricsRecorder>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        recorder.render(),
    )
}
