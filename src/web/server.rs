//! Web server for FileShare.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::WebConfig;
use crate::session::SessionManager;
use crate::{FileShareError, Result};

use super::handlers::AppState;
use super::router::create_app;

/// Interval between expired-session sweeps.
const SESSION_CLEANUP_INTERVAL_SECS: u64 = 600;

/// Web server for the API.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &WebConfig, app_state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| {
                FileShareError::Config(format!(
                    "invalid web server address {}:{}: {e}",
                    config.host, config.port
                ))
            })?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            web_config: config.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Periodically drop expired demo sessions.
    fn start_session_cleanup_task(sessions: SessionManager) {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(SESSION_CLEANUP_INTERVAL_SECS));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let removed = sessions.cleanup_expired().await;
                if removed > 0 {
                    tracing::info!(removed, "Cleaned up expired sessions");
                } else {
                    tracing::debug!("No expired sessions to clean up");
                }
            }
        });
    }

    async fn bind(self) -> std::io::Result<(TcpListener, axum::Router)> {
        let sessions = self.app_state.sessions.clone();
        let router = create_app(self.app_state, &self.web_config);

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        Self::start_session_cleanup_task(sessions);
        Ok((listener, router))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> std::io::Result<()> {
        let (listener, router) = self.bind().await?;
        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful for tests binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FileService, FileStorage};
    use crate::registry::FileRegistry;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn create_test_config() -> WebConfig {
        WebConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..WebConfig::default()
        }
    }

    async fn create_state(dir: &std::path::Path) -> AppState {
        let storage = FileStorage::open(dir).await.unwrap();
        AppState::new(
            FileService::new(FileRegistry::in_memory(), storage),
            SessionManager::default(),
            "http://localhost:8080",
        )
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let server = WebServer::new(&create_test_config(), create_state(temp_dir.path()).await)
            .unwrap();

        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_invalid_address() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = WebConfig {
            host: "not an address".to_string(),
            ..create_test_config()
        };

        let result = WebServer::new(&config, create_state(temp_dir.path()).await);
        assert!(matches!(result, Err(FileShareError::Config(_))));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let server = WebServer::new(&create_test_config(), create_state(temp_dir.path()).await)
            .unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        // Body may be chunked by the compression layer.
        let (_, body) = response.split_once("\r\n\r\n").unwrap();
        assert!(body.contains("OK"));
    }
}
