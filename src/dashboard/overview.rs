use crate::domain::{AviaryStatus, Reading};
use crate::remote::{Fetch, PageRequest, StatusSource};
use crate::session::Session;
use tracing::{info, instrument, warn};

/// Read-only summary shown on the landing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overview {
    pub readings: Vec<Reading>,
    /// `None` when the status could not be fetched.
    pub aviary_status: Option<AviaryStatus>,
}

impl Overview {
    /// Fetches the readings and the aviary status concurrently. Either half falls back to empty
    /// on its own.
    #[instrument(skip_all)]
    pub async fn load<S: Fetch<Reading> + StatusSource>(source: &S, session: &Session, page: PageRequest) -> Self {
        let token = session.token().await;
        let token = token.as_deref();

        info!("📊 Loading overview...");
        let (readings, status) = tokio::join!(Fetch::<Reading>::list(source, token, page), source.aviary_status(token));

        let readings = readings.unwrap_or_else(|e| {
            warn!("⚠️ Unable to load readings: {}", e);
            Vec::new()
        });
        let aviary_status = match status {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("⚠️ Unable to load the aviary status: {}", e);
                None
            }
        };
        info!(readings = readings.len(), "📊 Loading overview... OK");

        Overview { readings, aviary_status }
    }

    /// The most recent reading that carries a timestamp.
    pub fn latest_reading(&self) -> Option<&Reading> {
        self.readings
            .iter()
            .filter(|reading| reading.timestamp.is_some())
            .max_by_key(|reading| reading.timestamp)
    }
}
