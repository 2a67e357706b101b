use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Used when RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "mock_server=info";

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mock Todoist API listening");
    mock_server::run(listener).await
}
