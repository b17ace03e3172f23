use config::{Config, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    api: Api,
    ui: Ui,
    #[serde(default)]
    identity: Identity,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("HENHOUSE").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Remote,
    Fixtures,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    management_url: String,
    telemetry_url: String,
    page_size: u32,
    source: SourceKind,
    #[serde(with = "humantime_serde")]
    fixture_delay: Duration,
}

impl Api {
    pub fn management_url(&self) -> &str {
        self.management_url.trim_end_matches('/')
    }

    pub fn telemetry_url(&self) -> &str {
        self.telemetry_url.trim_end_matches('/')
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn fixture_delay(&self) -> Duration {
        self.fixture_delay
    }
}

#[derive(Debug, Deserialize)]
pub struct Ui {
    #[serde(with = "humantime_serde")]
    message_ttl: Duration,
}

impl Ui {
    pub fn message_ttl(&self) -> Duration {
        self.message_ttl
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Identity {
    token_file: Option<String>,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
}

impl Identity {
    pub fn token_file(&self) -> Option<&Path> {
        self.token_file.as_deref().map(Path::new)
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    // Pre-issued access token, used as-is without a login round trip
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                api: Api {
                    management_url: "http://management.url".to_string(),
                    telemetry_url: "http://telemetry.url".to_string(),
                    page_size: 5,
                    source: SourceKind::Remote,
                    fixture_delay: Duration::from_millis(500),
                },
                ui: Ui {
                    message_ttl: Duration::from_millis(2500),
                },
                identity: Identity::default(),
            },
        }
    }

    pub fn management_url(mut self, url: String) -> Self {
        self.config.api.management_url = url;
        self
    }

    pub fn telemetry_url(mut self, url: String) -> Self {
        self.config.api.telemetry_url = url;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
