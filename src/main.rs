use std::time::Duration;

use clinic_portal::infra::config::PortalConfig;
use clinic_portal::routes;
use clinic_portal::state::AppState;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PURGE_EVERY: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PortalConfig::from_env()?;
    let addr = config.listen_addr;
    let idle = config.browser_idle;
    let shared_state = AppState::new(config)?;

    let browsers = shared_state.browsers.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(PURGE_EVERY);
        loop {
            tick.tick().await;
            let purged = browsers.purge_idle(idle);
            if purged > 0 {
                tracing::debug!(purged, remaining = browsers.len(), "dropped idle browsers");
            }
        }
    });

    let app = routes::router(shared_state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
