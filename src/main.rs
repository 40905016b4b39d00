use anyhow::Result;
use hoststat::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        build_hash = %app_config.build.hash,
        deployed_at = %app_config.build.deployed_at,
        refresh_interval_secs = app_config.collector.refresh_interval_secs,
        "{} {} starting",
        version::NAME,
        version::VERSION
    );

    let host: Arc<dyn host::HostSource> = Arc::new(sysinfo_repo::SysinfoRepo::new());
    let assembler = collector::SnapshotAssembler::new(host, app_config.assembler_config());
    let collector = Arc::new(collector::Collector::new(Arc::new(assembler)));

    if app_config.auth.token.is_none() {
        tracing::warn!("auth.token not set; protected routes are open to every caller");
    }
    let authorizer = auth::from_token(app_config.auth.token.as_deref());

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let scheduler_handle = worker::spawn(
        collector.clone(),
        app_config.scheduler_config(),
        shutdown_rx,
    );

    let app = routes::app(collector, authorizer, &app_config);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    let _ = scheduler_handle.await;
    Ok(())
}
