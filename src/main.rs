use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

use mixcheck::MixCheckService;
use mixcheck::config::Config;
use mixcheck::web;

#[tokio::main]
async fn main() -> Result<()> {
    // Tracing to stderr so stdout stays clean for process supervisors
    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();
    let service = Arc::new(MixCheckService::new(&config)?);

    let bind: SocketAddr = config.http.bind.parse()?;
    let router = web::router(service);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        %bind,
        model = %config.groq.model,
        "starting {} {}",
        config.server.name,
        config.server.version
    );

    axum::serve(listener, router).await?;
    Ok(())
}
