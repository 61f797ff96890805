use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct App {
    pub level: String,
}

/// Database backing store. `memory` is for local experiments only; data is
/// gone on exit.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    /// Reads `moneta.toml` from the working directory, then `MONETA__*`
    /// environment variables on top.
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .add_source(File::with_name("moneta").required(false))
            .add_source(Environment::with_prefix("MONETA").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
