use serde::Deserialize;

use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub openai: OpenAiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Semantic cache backend settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Redis connection URL
    pub url: String,
    /// Whether semantic caching is enabled
    pub enabled: bool,
    /// Similarity threshold for cache hits
    pub similarity_threshold: f32,
    /// Entry TTL in seconds
    pub ttl_secs: u64,
}

/// Vector store settings
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSettings {
    /// Qdrant base URL
    pub url: String,
    /// Optional api-key header value
    pub api_key: Option<String>,
    /// Number of chunks retrieved per query
    pub top_k: usize,
}

/// OpenAI-backed embedding and generation settings
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    /// API key; required at startup
    pub api_key: String,
    /// Optional base URL override (proxies, compatible gateways)
    pub base_url: Option<String>,
    /// Embedding model
    pub embedding_model: String,
    /// Chat model used for answer synthesis
    pub chat_model: String,
    /// Sampling temperature for synthesis
    pub temperature: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            enabled: true,
            similarity_threshold: 0.85,
            ttl_secs: 3600,
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            api_key: None,
            top_k: 4,
        }
    }
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            embedding_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("SEMANTRA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut loaded: Self = config.try_deserialize()?;
        loaded.apply_env_overrides();

        Ok(loaded)
    }

    // Unprefixed variables used by common deployments of the same backends.
    fn apply_env_overrides(&mut self) {
        if self.openai.api_key.is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                self.openai.api_key = key;
            }
        }

        if let Ok(url) = std::env::var("REDIS_URL") {
            self.cache.url = url;
        }

        if let Ok(url) = std::env::var("QDRANT_URL") {
            self.retrieval.url = url;
        }

        if let Ok(key) = std::env::var("QDRANT_API_KEY") {
            self.retrieval.api_key = Some(key);
        }
    }

    /// Reject configurations the service cannot start with.
    ///
    /// Runs before any query is accepted; a missing credential here is fatal
    /// rather than a per-request failure.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.openai.api_key.is_empty() {
            return Err(DomainError::configuration(
                "OpenAI API key is required (set SEMANTRA__OPENAI__API_KEY or OPENAI_API_KEY)",
            ));
        }

        if !(0.0..=1.0).contains(&self.cache.similarity_threshold) {
            return Err(DomainError::configuration(format!(
                "cache.similarity_threshold must be within [0.0, 1.0], got {}",
                self.cache.similarity_threshold
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(DomainError::configuration("retrieval.top_k must be >= 1"));
        }

        Ok(())
    }
}
