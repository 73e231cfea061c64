#[cfg(test)]
pub mod test_utils {
    use crate::config::{initialize_app_state, AppConfig};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::{
        http::{header::CONTENT_TYPE, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::Value;
    use std::path::PathBuf;
    use tokio::net::TcpListener;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Serve `upstream` on an ephemeral local port and return its base URL
    pub async fn spawn_upstream(upstream: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake prediction service");
        let address = listener
            .local_addr()
            .expect("Fake prediction service has no address");

        tokio::spawn(async move {
            axum::serve(listener, upstream)
                .await
                .expect("Fake prediction service stopped");
        });

        format!("http://{}", address)
    }

    /// Fake prediction service answering every `/predict` with a fixed reply
    pub async fn spawn_upstream_replying(
        status: StatusCode,
        content_type: &'static str,
        body: &'static str,
    ) -> String {
        let upstream = Router::new().route(
            "/predict",
            post(move || async move { (status, [(CONTENT_TYPE, content_type)], body) }),
        );
        spawn_upstream(upstream).await
    }

    /// Fake prediction service that answers with the JSON it received
    pub async fn spawn_echo_upstream() -> String {
        let upstream = Router::new().route(
            "/predict",
            post(|Json(payload): Json<Value>| async move { Json(payload) }),
        );
        spawn_upstream(upstream).await
    }

    /// Base URL on which nothing is listening
    pub async fn unreachable_upstream() -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to reserve a local port");
        let address = listener.local_addr().expect("Reserved port has no address");
        drop(listener);
        format!("http://{}", address)
    }

    /// Configuration for testing: metrics off, no frontend bundle
    pub fn test_config(prediction_base_url: &str) -> AppConfig {
        AppConfig {
            bind_address: "127.0.0.1:0".to_string(),
            prediction_base_url: prediction_base_url.to_string(),
            static_dir: None,
            metrics_enabled: false,
        }
    }

    /// Create AppState for testing
    pub fn setup_test_app_state(prediction_base_url: &str) -> AppState {
        initialize_app_state(test_config(prediction_base_url))
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The subscriber is process-wide so it stays active for every test.
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    pub fn init_test_tracing() {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        // Fails once an earlier test has installed it
        let _ = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .try_init();
    }

    /// Create axum app for testing, relaying to `prediction_base_url`
    pub fn setup_test_app(prediction_base_url: &str) -> Router {
        init_test_tracing();

        let state = setup_test_app_state(prediction_base_url);
        create_router(state)
    }

    /// Create axum app for testing that also serves files from `static_dir`
    pub fn setup_test_app_with_static_dir(prediction_base_url: &str, static_dir: PathBuf) -> Router {
        init_test_tracing();

        let config = AppConfig {
            static_dir: Some(static_dir),
            ..test_config(prediction_base_url)
        };
        create_router(initialize_app_state(config))
    }
}
