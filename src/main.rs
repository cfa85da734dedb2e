use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::{
    config::AppConfig,
    http::{self, AppState},
};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Article publishing service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[arg(short, long, default_value = "5000")]
    port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("folio={filter_level},tower_http=info").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!(
        "Tracking up to {} recently viewed articles per user",
        config.recently_viewed_capacity
    );

    let purge_every = config.token_purge_interval;
    let state = AppState::new(config);
    let purge = Arc::clone(&state.tokens).spawn_purge(purge_every);

    let app = http::router(state);

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;

    info!("Folio server started on {}", bind_addr);
    info!("");
    info!("Usage:");
    info!(
        "   curl -X POST -H 'Content-Type: application/json' -d '{{\"username\":\"me\",\"password\":\"pw\"}}' http://{}/api/auth/register",
        bind_addr
    );
    info!("   curl -H 'Authorization: Bearer <token>' http://{}/api/users/me/recently-viewed", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    purge.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from(["folio", "--port", "9000", "--debug"]).unwrap();

        assert_eq!(args.port, 9000);
        assert_eq!(args.host, "127.0.0.1");
        assert!(args.debug);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["folio"]).unwrap();

        assert_eq!(args.port, 5000);
        assert!(!args.debug);
    }
}
