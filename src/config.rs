use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "PharmaGuard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default explanation timeout. The upstream service has no deadline of its own.
pub const DEFAULT_EXPLAIN_TIMEOUT_SECS: u64 = 8;

/// Default Gemini model for clinical reasoning.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default local Ollama endpoint and model.
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "medgemma:latest";

/// Get the application data directory.
///
/// `PHARMAGUARD_DATA_DIR` wins; otherwise `~/PharmaGuard`. Falls back to a
/// relative `PharmaGuard` directory when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = env_non_empty("PHARMAGUARD_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(APP_NAME))
}

/// Directory holding the persisted key-value documents.
pub fn storage_dir() -> PathBuf {
    app_data_dir().join("storage")
}

/// Directory where exported audit logs are written.
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,pharmaguard_lib=debug,reqwest=warn,hyper=warn"
}

// ═══════════════════════════════════════════════════════════
// Text-generation backend configuration
// ═══════════════════════════════════════════════════════════

/// Which text-generation service backs clinical explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Gemini,
    Ollama,
}

impl LlmBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }
}

/// Resolved text-generation configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    /// Service credential. Only the Gemini backend needs one.
    pub api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub ollama_host: String,
    pub ollama_model: String,
    pub explain_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::Gemini,
            api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            explain_timeout: Duration::from_secs(DEFAULT_EXPLAIN_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// Read configuration from the process environment.
    ///
    /// Unknown or unparsable values keep the defaults and are logged.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get("PHARMAGUARD_LLM_BACKEND") {
            match LlmBackend::parse(&raw) {
                Some(backend) => config.backend = backend,
                None => tracing::warn!(value = %raw, "Unknown LLM backend, using gemini"),
            }
        }

        config.api_key = get("GEMINI_API_KEY").or_else(|| get("API_KEY"));

        if let Some(model) = get("PHARMAGUARD_GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Some(base) = get("PHARMAGUARD_GEMINI_BASE_URL") {
            config.gemini_base_url = base;
        }
        if let Some(host) = get("OLLAMA_HOST") {
            config.ollama_host = host;
        }
        if let Some(model) = get("PHARMAGUARD_OLLAMA_MODEL") {
            config.ollama_model = model;
        }
        if let Some(raw) = get("PHARMAGUARD_EXPLAIN_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.explain_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "Invalid explanation timeout, keeping default"),
            }
        }

        config
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn storage_dir_under_app_data() {
        let storage = storage_dir();
        assert!(storage.starts_with(app_data_dir()));
        assert!(storage.ends_with("storage"));
    }

    #[test]
    fn app_name_is_pharmaguard() {
        assert_eq!(APP_NAME, "PharmaGuard");
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = LlmConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.backend, LlmBackend::Gemini);
        assert!(config.api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.explain_timeout, Duration::from_secs(8));
    }

    #[test]
    fn api_key_falls_back_to_generic_variable() {
        let config = LlmConfig::from_lookup(lookup_from(&[("API_KEY", "k-123")]));
        assert_eq!(config.api_key.as_deref(), Some("k-123"));

        let config = LlmConfig::from_lookup(lookup_from(&[
            ("API_KEY", "generic"),
            ("GEMINI_API_KEY", "specific"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("specific"));
    }

    #[test]
    fn ollama_backend_selected_case_insensitively() {
        let config = LlmConfig::from_lookup(lookup_from(&[
            ("PHARMAGUARD_LLM_BACKEND", "Ollama"),
            ("OLLAMA_HOST", "http://10.0.0.5:11434"),
        ]));
        assert_eq!(config.backend, LlmBackend::Ollama);
        assert_eq!(config.ollama_host, "http://10.0.0.5:11434");
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = LlmConfig::from_lookup(lookup_from(&[
            ("PHARMAGUARD_LLM_BACKEND", "openai"),
            ("PHARMAGUARD_EXPLAIN_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.backend, LlmBackend::Gemini);
        assert_eq!(config.explain_timeout, Duration::from_secs(8));

        let config = LlmConfig::from_lookup(lookup_from(&[(
            "PHARMAGUARD_EXPLAIN_TIMEOUT_SECS",
            "0",
        )]));
        assert_eq!(config.explain_timeout, Duration::from_secs(8));
    }

    #[test]
    fn timeout_override_applies() {
        let config = LlmConfig::from_lookup(lookup_from(&[(
            "PHARMAGUARD_EXPLAIN_TIMEOUT_SECS",
            "3",
        )]));
        assert_eq!(config.explain_timeout, Duration::from_secs(3));
    }
}
