use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nautical_server::cache::{BuoyCache, BuoyService, CacheConfig};
use nautical_server::ndbc::{MockNdbcClient, NdbcClient, NdbcConfig, Upstream};
use nautical_server::web::{AppState, create_router};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Serve a cached view of NDBC buoy stations.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Host name or address to bind
    #[arg(short = 'a', long, env = "NAUTICAL_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind
    #[arg(short, long, env = "NAUTICAL_REST_API_PORT", default_value_t = 5000)]
    port: u16,

    /// Log level when RUST_LOG is not set
    #[arg(short, long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Seconds to wait before retrying a failed refresh
    #[arg(short = 'i', long, default_value_t = 60)]
    retry_interval: u64,

    /// Seconds before an upstream request is abandoned
    #[arg(long, default_value_t = 30)]
    fetch_timeout: u64,

    /// NDBC base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Serve from a directory of mock data instead of NDBC
    #[arg(long)]
    mock_data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nautical_server={}", args.log_level.as_str())));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let upstream = match &args.mock_data {
        Some(dir) => {
            let client = MockNdbcClient::new(dir)?;
            info!(dir = %dir.display(), stations = client.observation_count(), "using mock data");
            Upstream::Mock(client)
        }
        None => {
            let mut config = NdbcConfig::new().with_timeout(args.fetch_timeout);
            if let Some(url) = &args.base_url {
                config = config.with_base_url(url);
            }
            info!(base_url = %config.base_url, "using NDBC");
            Upstream::Live(NdbcClient::new(config)?)
        }
    };

    let cache_config = CacheConfig::default()
        .with_retry_interval(Duration::from_secs(args.retry_interval))
        .with_fetch_timeout(Duration::from_secs(args.fetch_timeout));
    let cache = Arc::new(BuoyCache::new(upstream, cache_config));

    let state = AppState::new(Arc::clone(&cache))?;
    let service = BuoyService::new(cache);
    service.run().await;

    let listener = bind(&args.host, args.port).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.stop().await;
    info!("shut down");
    Ok(())
}

/// Bind the API listener. `host` may be a name such as `localhost`.
async fn bind(host: &str, port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind((host, port)).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default() {
        let args = Args::parse_from(["nautical-server"]);
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 5000);
        assert_eq!(args.retry_interval, 60);
        assert_eq!(args.fetch_timeout, 30);
        assert!(args.mock_data.is_none());
    }

    #[test]
    fn args_accept_host_name() {
        let args = Args::parse_from(["nautical-server", "-a", "localhost", "-p", "0"]);
        assert_eq!(args.host, "localhost");
        assert_eq!(args.port, 0);
    }

    #[tokio::test]
    async fn bind_resolves_host_name() {
        let listener = bind("localhost", 0).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
