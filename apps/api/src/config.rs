use anyhow::{Context, Result};

/// One OpenAI-compatible chat provider. Present only when its API key is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub name: String,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; AI providers are enabled by their API key.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub perplexity: Option<ProviderConfig>,
    pub openai: Option<ProviderConfig>,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests can pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = |name: &str, prefix: &str, base_url: &str, model: &str| {
            var(&format!("{prefix}_API_KEY")).map(|api_key| ProviderConfig {
                name: name.to_string(),
                base_url: var(&format!("{prefix}_BASE_URL"))
                    .unwrap_or_else(|| base_url.to_string()),
                api_key,
                model: var(&format!("{prefix}_MODEL")).unwrap_or_else(|| model.to_string()),
            })
        };

        Ok(Config {
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            perplexity: provider(
                "perplexity",
                "PERPLEXITY",
                "https://api.perplexity.ai",
                "llama-3.1-sonar-small-128k-online",
            ),
            openai: provider("openai", "OPENAI", "https://api.openai.com/v1", "gpt-4o"),
            llm_timeout_secs: var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "60".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            llm_max_retries: var("LLM_MAX_RETRIES")
                .unwrap_or_else(|| "3".to_string())
                .parse::<u32>()
                .context("LLM_MAX_RETRIES must be a non-negative integer")?,
        })
    }

    /// Defaults with no AI providers. Used by tests.
    #[cfg(test)]
    pub fn offline() -> Self {
        Self::from_lookup(|_| None).expect("defaults parse")
    }
}
