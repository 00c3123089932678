use serde::Deserialize;

pub const MAX_BATCH_SIZE: usize = 10_000_000;
pub const ENV_PREFIX: &str = "FNORDLOAD";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub redis_url: String,
    pub batch_size: usize,
    pub queue_key: String,
    pub event_key_prefix: String,
    /// Glob handed to `KEYS`. The default does not match `event_key_prefix`.
    pub inspect_pattern: String,
    pub event_type: String,
    /// Zero runs until cancelled.
    pub max_iterations: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str),
    Source(config::ConfigError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(error) => write!(f, "invalid load config: {error}"),
            Self::Source(error) => write!(f, "failed to read load config: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(_) => None,
            Self::Source(error) => Some(error),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(error: config::ConfigError) -> Self { Self::Source(error) }
}

impl LoadConfig {
    /// Defaults overlaid with `FNORDLOAD_*` variables, e.g. `FNORDLOAD_REDIS_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    pub fn from_environment(environment: config::Environment) -> Result<Self, ConfigError> {
        let loaded: Self = config::Config::builder().add_source(environment).build()?.try_deserialize()?;
        loaded.validate().map_err(ConfigError::Invalid)?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.redis_url.is_empty() {
            return Err("redis url must not be empty");
        }
        if self.batch_size == 0 {
            return Err("batch size must be at least 1");
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err("batch size exceeds hard max");
        }
        if self.queue_key.is_empty() {
            return Err("queue key must not be empty");
        }
        if self.event_key_prefix.is_empty() {
            return Err("event key prefix must not be empty");
        }
        if self.inspect_pattern.is_empty() {
            return Err("inspect pattern must not be empty");
        }

        Ok(())
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_owned(),
            batch_size: 10_000,
            queue_key: "fnordmetric-queue".to_owned(),
            event_key_prefix: "fnordmetric-event-".to_owned(),
            inspect_pattern: "fnordmetric-blubber*".to_owned(),
            event_type: "foobar".to_owned(),
            max_iterations: 0,
        }
    }
}
