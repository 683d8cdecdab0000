use anyhow::Context;
use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fs, path::PathBuf, time::Duration};
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "deepseek-coder-v2:16b";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OllamaFileConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

/// Process-wide settings, read once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub model: String,
    pub connect_timeout: Duration,
    // None keeps the connect-only behaviour: a silent server blocks `send`.
    pub request_timeout: Option<Duration>,
    pub proxy: Option<String>,
    /// Hosts that bypass `proxy`, in `NO_PROXY` syntax.
    pub no_proxy: Option<String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: None,
            proxy: None,
            no_proxy: None,
        }
    }
}

impl OllamaConfig {
    pub fn from_env_and_file() -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        if let Some(path) = Self::config_path() {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(text) => match toml::from_str::<OllamaFileConfig>(&text) {
                        Ok(file_cfg) => {
                            info!(target: "providers::ollama", "config loaded from {}", path.display());
                            cfg.apply_file(file_cfg);
                        }
                        Err(e) => {
                            warn!(target: "providers::ollama", "ignoring invalid config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        warn!(target: "providers::ollama", "cannot read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        if let Ok(endpoint) = env::var("CODECHAT_ENDPOINT") {
            cfg.endpoint = endpoint;
        }
        if let Ok(model) = env::var("CODECHAT_MODEL") {
            cfg.model = model;
        }
        cfg.proxy = proxy_for(
            &cfg.endpoint,
            env_any(&["HTTPS_PROXY", "https_proxy"]),
            env_any(&["HTTP_PROXY", "http_proxy"]),
        );
        cfg.no_proxy = env_any(&["NO_PROXY", "no_proxy"]);

        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overlaid with a TOML document.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let file_cfg: OllamaFileConfig = toml::from_str(text).context("parse config toml")?;
        let mut cfg = Self::default();
        cfg.apply_file(file_cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_file(&mut self, file_cfg: OllamaFileConfig) {
        if let Some(e) = file_cfg.endpoint {
            self.endpoint = e;
        }
        if let Some(m) = file_cfg.model {
            self.model = m;
        }
        if let Some(t) = file_cfg.connect_timeout_ms {
            self.connect_timeout = Duration::from_millis(t);
        }
        if let Some(t) = file_cfg.request_timeout_ms {
            self.request_timeout = Some(Duration::from_millis(t));
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.endpoint)
            .with_context(|| format!("invalid endpoint url: {}", self.endpoint))?;
        if self.model.trim().is_empty() {
            anyhow::bail!("model id must not be empty");
        }
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".codechat").join("config.toml")
        } else {
            base.config_dir().join("codechat").join("config.toml")
        };
        Some(p)
    }
}

fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|n| env::var(n).ok())
        .filter(|v| !v.trim().is_empty())
}

/// Pick the proxy variable matching the endpoint scheme.
fn proxy_for(endpoint: &str, https: Option<String>, http: Option<String>) -> Option<String> {
    match Url::parse(endpoint).ok()?.scheme() {
        "https" => https,
        "http" => http,
        _ => None,
    }
}
