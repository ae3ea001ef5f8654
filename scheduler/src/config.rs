use std::env;
use std::path::PathBuf;

const DEFAULT_APISERVER: &str = "http://localhost:7620";
const DEFAULT_QUEUE_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to decode plugin args: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid mode, got {0}")]
    InvalidMode(String),
    #[error("failed to read plugin args: {0}")]
    ReadArgs(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub apiserver: String,
    /// Inline plugin args, takes precedence over `plugin_args_file`
    pub plugin_args: Option<String>,
    pub plugin_args_file: Option<PathBuf>,
    pub queue_size: usize,
}

impl Config {
    /// Raw plugin args payload, if any was configured.
    pub fn load_plugin_args(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        if let Some(inline) = &self.plugin_args {
            return Ok(Some(inline.clone().into_bytes()));
        }
        match &self.plugin_args_file {
            Some(path) => Ok(Some(std::fs::read(path)?)),
            None => Ok(None),
        }
    }
}

pub fn load_config() -> Config {
    let apiserver = env::var("CR8S_APISERVER")
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_APISERVER.to_string());

    let plugin_args = env::var("SCHEDULER_PLUGIN_ARGS")
        .ok()
        .filter(|s| !s.trim().is_empty());

    let plugin_args_file = env::var("SCHEDULER_PLUGIN_ARGS_FILE")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let queue_size = env::var("SCHEDULER_QUEUE_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_QUEUE_SIZE);

    Config {
        apiserver,
        plugin_args,
        plugin_args_file,
        queue_size,
    }
}
