use henhouse::app_config::{AppConfig, SourceKind};
use henhouse::dashboard::{Dashboard, DashboardSource, Page};
use henhouse::list::ListOptions;
use henhouse::remote::{FixtureSource, RemoteClient};
use henhouse::session::{Credentials, Session, TokenStore, login};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🐔 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let client = RemoteClient::new(&config)?;
    let session = establish_session(&client, &config).await?;
    let options = ListOptions::from_config(&config);

    match config.api().source() {
        SourceKind::Remote => run(Arc::new(client), session, options).await,
        SourceKind::Fixtures => {
            info!("🧪 Serving fixture data with a delay of {:?}", config.api().fixture_delay());
            run(Arc::new(FixtureSource::seeded(config.api().fixture_delay())), session, options).await
        }
    }

    Ok(())
}

async fn establish_session(client: &RemoteClient, config: &AppConfig) -> Result<Session, Box<dyn std::error::Error>> {
    let identity = config.identity();
    let session = match identity.token_file() {
        Some(path) => Session::restore(TokenStore::new(path)).await?,
        None => Session::new(),
    };

    if session.is_signed_in().await {
        return Ok(session);
    }

    match (identity.token(), identity.username(), identity.password()) {
        (Some(token), _, _) => session.sign_in(Credentials::bearer(token)).await?,
        (None, Some(username), Some(password)) => match login(client, username, password).await {
            Ok(credentials) => session.sign_in(credentials).await?,
            Err(e) => warn!("⚠️ Unable to sign in, continuing read-only: {}", e),
        },
        _ => warn!("⚠️ No credentials configured, changes will be refused"),
    }

    Ok(session)
}

async fn run<S: DashboardSource>(source: Arc<S>, session: Session, options: ListOptions) {
    let dashboard = Dashboard::new(source, session, options);
    dashboard.load_all().await;

    for (page, count) in dashboard.summary().await {
        info!("📋 {}: {} record(s) at {}", page.title(), count, page.route());
    }

    if let Some(overview) = dashboard.overview().await {
        match &overview.aviary_status {
            Some(status) => info!(
                "📊 {} hens, ammonia level {}, condition {}",
                status.total_galinhas, status.nivel_amonia, status.condicao
            ),
            None => warn!("⚠️ Aviary status unavailable"),
        }
        if let Some(reading) = overview.latest_reading() {
            info!(
                "📊 Latest reading from sensor {}: {}",
                reading.id_sensor.as_deref().unwrap_or("?"),
                reading.leitura
            );
        }
    }

    info!("🔥 {} is ready on {}", env!("CARGO_PKG_NAME"), Page::Overview.route());
}
