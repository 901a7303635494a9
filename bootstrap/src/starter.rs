//! 服务启动器
//!
//! 提供统一的 HTTP 服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use taproom_config::{AppConfig, ServerConfig};
use taproom_errors::AppResult;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::health::{HealthChecker, health_routes};
use crate::infrastructure::Infrastructure;
use crate::metrics::{MetricsRecorder, track_metrics};
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 这是服务的统一入口点。它负责：
/// 1. 加载配置
/// 2. 初始化运行时（日志）和 metrics recorder
/// 3. 创建基础设施资源（数据库、TokenService）
/// 4. 调用用户提供的闭包构建业务路由
/// 5. 挂载健康检查、metrics 和通用 HTTP 中间件
/// 6. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// use taproom_bootstrap::run_http;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_http("config", |infra| async move {
///         Ok(my_service::api::router(build_state(&infra).await?))
///     })
///     .await
/// }
/// ```
pub async fn run_http<F, Fut>(
    config_dir: &str,
    router_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Arc<Infrastructure>) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let metrics = if config.telemetry.metrics_enabled {
        MetricsRecorder::install()
    } else {
        None
    };

    // 3. 创建基础设施（带重试）
    let infra = Arc::new(Infrastructure::from_config(config).await?);

    // 4. 构建业务路由
    let api = router_builder(infra.clone()).await?;

    // 5. 组装应用
    let app = build_app(api, &infra, metrics);

    let server = infra.server_config();
    let addr: SocketAddr = format!("{}:{}", server.host, server.port).parse()?;

    info!(%addr, "HTTP server starting");

    // 6. 启动服务器
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");

    Ok(())
}

/// 在业务路由上挂载健康检查、metrics 和通用中间件
pub fn build_app(api: Router, infra: &Infrastructure, metrics: Option<MetricsRecorder>) -> Router {
    let checker = Arc::new(HealthChecker::new(infra.postgres_pool()));

    let mut app = api
        .route_layer(middleware::from_fn(track_metrics))
        .merge(health_routes(checker));

    if let Some(recorder) = metrics {
        app = app.merge(recorder.routes());
    }

    apply_http_layers(app, infra.server_config())
}

/// 通用 HTTP 中间件：请求追踪、超时、请求体大小限制
pub fn apply_http_layers(router: Router, server: &ServerConfig) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use taproom_config::{AuthConfig, StorageConfig, TelemetryConfig};
    use tower::ServiceExt;

    fn test_config(body_limit_bytes: usize) -> AppConfig {
        AppConfig {
            app_name: "beer-service".to_string(),
            app_env: "test".to_string(),
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                request_timeout_secs: 5,
                body_limit_bytes,
            },
            telemetry: TelemetryConfig::default(),
            storage: StorageConfig::default(),
            database: None,
            auth: AuthConfig::default(),
        }
    }

    fn api() -> Router {
        Router::new().route("/echo", post(|body: String| async move { body }))
    }

    #[tokio::test]
    async fn test_build_app_mounts_health() {
        let infra = Infrastructure::in_memory(test_config(1024)).unwrap();
        let app = build_app(api(), &infra, None);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_body_limit_rejects_large_payload() {
        let infra = Infrastructure::in_memory(test_config(16)).unwrap();
        let app = build_app(api(), &infra, None);

        let response = app
            .oneshot(
                Request::post("/echo")
                    .body(Body::from("x".repeat(64)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let mut config = test_config(1024);
        config.server.request_timeout_secs = 1;
        let infra = Infrastructure::in_memory(config).unwrap();
        let slow = Router::new().route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let app = build_app(slow, &infra, None);

        let response = app
            .oneshot(Request::post("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
