use config::{Config, ConfigError, Environment as EnvSource, File};
use serde::Deserialize;
use std::path::Path;

/// Flat environment variables used by existing deployments, mapped onto their settings keys.
/// These take precedence over both the configuration files and `APP_`-prefixed variables.
const DEPLOYMENT_OVERRIDES: [(&str, &str); 6] = [
    ("PORT", "application.port"),
    ("DB_NAME", "database.name"),
    ("COLLECTION_DL", "database.collection"),
    ("MONGO_URI", "database.uri"),
    ("MONGO_MIN_POOL_SIZE", "database.min_pool_size"),
    ("MONGO_MAX_POOL_SIZE", "database.max_pool_size"),
];

/// All settings for the server.
#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// Application settings.
    pub application: ApplicationSettings,

    /// Location store settings.
    pub database: DatabaseSettings,
}

/// Application settings.
#[derive(Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    /// The port number on which the application will listen.
    pub port: u16,

    /// The hostname or IP address where the application will run.
    ///
    /// This is a `String` that specifies the network address at which the application is
    /// accessible. This could be a hostname like "localhost" or an IP address like
    /// "127.0.0.1".
    pub host: String,
}

impl ApplicationSettings {
    /// The `host:port` pair to bind the listener to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which store implementation backs the driver location routes.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// A MongoDB collection.
    Mongo,
    /// An in-process map. Nothing survives a restart.
    Memory,
}

/// Location store settings.
#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings {
    pub backend: StoreBackend,

    /// MongoDB connection string, e.g. `mongodb://localhost:27017`.
    pub uri: String,

    /// Database holding the driver location collection.
    pub name: String,

    /// Collection holding one document per driver.
    pub collection: String,

    pub min_pool_size: u32,
    pub max_pool_size: u32,
}

impl DatabaseSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pool_size > self.max_pool_size {
            return Err(ConfigError::Message(format!(
                "database.min_pool_size ({}) must not exceed database.max_pool_size ({})",
                self.min_pool_size, self.max_pool_size
            )))
        }
        Ok(())
    }
}

/// Based on the `APP_ENVIRONMENT` environment variable, reads the corresponding configuration file
/// and returns the settings.
///
/// Sources are layered in order: `config/base.toml`, the environment file, `APP_`-prefixed
/// environment variables (e.g. `APP_DATABASE__URI`), then the flat deployment variables such as
/// `MONGO_URI` and `PORT`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;

    build_settings(&base_path.join("config"), &environment, non_empty_var)
}

fn build_settings(
    config_dir: &Path,
    environment: &Environment,
    deployment_var: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let environment_filename = format!("{}.toml", environment.as_str());

    let mut builder = Config::builder()
        .add_source(File::from(config_dir.join("base.toml")).required(true))
        .add_source(File::from(config_dir.join(environment_filename)).required(false))
        .add_source(EnvSource::with_prefix("APP").prefix_separator("_").separator("__"));
    for (var, key) in DEPLOYMENT_OVERRIDES {
        builder = builder.set_override_option(key, deployment_var(var))?;
    }
    // A deployment that names its MongoDB server always gets the MongoDB store.
    if deployment_var("MONGO_URI").is_some() {
        builder = builder.set_override("database.backend", "mongo")?;
    }

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.database.validate()?;
    Ok(settings)
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// The possible runtime environments for the application.
#[derive(Debug, PartialEq, Eq)]
pub enum Environment {
    /// Local development environment.
    Local,
    /// Production environment.
    Production,
}

impl Environment {
    /// Returns the environment as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Must be `local` or `production`"
            )),
        }
    }
}
