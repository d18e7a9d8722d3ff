use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub azure: AzureConfig,
    pub tutor: TutorConfig,
    pub logging: LoggingConfig,
    pub static_config: StaticConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Azure OpenAI deployment used for every model call
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    pub api_key: String,
    pub endpoint: String,
    pub api_version: String,
    pub deployment_name: String,
    /// Per-request timeout in seconds (accepts "60", "30s", "2m")
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Number of trailing conversation turns sent with each reply request
    pub history_window: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub enabled: bool,
    pub web_root: String,
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from the explicit path, or the first config.toml found
    /// 2. Override with environment variables
    /// 3. Validate the final configuration
    pub fn load(explicit_path: Option<&str>) -> Result<Self, anyhow::Error> {
        let config_path = match explicit_path {
            Some(path) => Some(path.to_string()),
            None => Self::find_config_file(),
        };

        let mut config = if let Some(config_path) = config_path {
            tracing::info!("Loading configuration from {}", config_path);
            Self::from_toml(&config_path)?
        } else {
            tracing::warn!("Configuration file not found, using defaults");
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST / APP_SERVER_PORT
    /// - APP_LOG_LEVEL: Logging filter (e.g., "info,chinese_tutor=debug")
    /// - APP_HISTORY_WINDOW: Trailing turns sent to the model
    /// - AZURE_OPENAI_API_KEY / AZURE_OPENAI_ENDPOINT
    /// - AZURE_OPENAI_API_VERSION / AZURE_OPENAI_DEPLOYMENT_NAME
    /// - APP_AZURE_TIMEOUT: Request timeout (accepts "30s", "2m")
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Ok(window) = std::env::var("APP_HISTORY_WINDOW") {
            match window.parse() {
                Ok(val) => {
                    self.tutor.history_window = val;
                    tracing::info!(
                        "Override tutor.history_window from env: {}",
                        self.tutor.history_window
                    );
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_HISTORY_WINDOW '{}': {} (keep {})",
                    window,
                    e,
                    self.tutor.history_window
                ),
            }
        }

        if let Ok(key) = std::env::var("AZURE_OPENAI_API_KEY") {
            self.azure.api_key = key;
            tracing::info!("Override azure.api_key from env");
        }

        if let Ok(endpoint) = std::env::var("AZURE_OPENAI_ENDPOINT") {
            self.azure.endpoint = endpoint;
            tracing::info!("Override azure.endpoint from env: {}", self.azure.endpoint);
        }

        if let Ok(version) = std::env::var("AZURE_OPENAI_API_VERSION") {
            self.azure.api_version = version;
            tracing::info!("Override azure.api_version from env: {}", self.azure.api_version);
        }

        if let Ok(deployment) = std::env::var("AZURE_OPENAI_DEPLOYMENT_NAME") {
            self.azure.deployment_name = deployment;
            tracing::info!(
                "Override azure.deployment_name from env: {}",
                self.azure.deployment_name
            );
        }

        if let Ok(timeout) = std::env::var("APP_AZURE_TIMEOUT") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.azure.timeout_secs = val;
                    tracing::info!("Override azure.timeout_secs from env: {}", val);
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_AZURE_TIMEOUT '{}': {} (keep {})",
                    timeout,
                    e,
                    self.azure.timeout_secs
                ),
            }
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.tutor.history_window == 0 {
            anyhow::bail!("tutor.history_window must be > 0");
        }

        if self.azure.timeout_secs == 0 {
            anyhow::bail!("azure.timeout_secs must be > 0");
        }

        let mut missing = Vec::new();
        if self.azure.api_key.trim().is_empty() {
            missing.push("AZURE_OPENAI_API_KEY");
        }
        if self.azure.endpoint.trim().is_empty() {
            missing.push("AZURE_OPENAI_ENDPOINT");
        }
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required Azure OpenAI settings: {}. Set them in the environment, \
                 a .env file, or the [azure] section of config.toml",
                missing.join(", ")
            );
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 5000 }
    }
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            api_version: "2024-02-01".to_string(),
            deployment_name: "gpt-4".to_string(),
            timeout_secs: 60,
        }
    }
}

// Keeps the API key out of logs
impl std::fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConfig")
            .field("api_key", &"***")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("deployment_name", &self.deployment_name)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self { history_window: 8 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,chinese_tutor=debug".to_string(), file: None }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self { enabled: true, web_root: "web".to_string() }
    }
}

// =========================
// Helpers for parsing values
// =========================

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    let multiplier: u64 = match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hour" | "hours" => 60 * 60,
        _ => return Err(format!("unsupported unit: {}", unit)),
    };
    n.checked_mul(multiplier).ok_or_else(|| format!("duration too large: {}", input))
}

// Accepts either a number of seconds or a human-friendly string
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '2m'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}
