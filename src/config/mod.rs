use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

const ENV_PREFIX: &str = "PROJECT_BOARD_";

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the projects backend
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// File holding the signed-in user's email
    #[serde(default = "default_identity_file")]
    pub identity_file: PathBuf,
    /// Log output, the terminal itself belongs to the UI
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_identity_file() -> PathBuf {
    PathBuf::from(".project_board").join("email")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("project_board.log")
}

impl Config {
    /// Load configuration from `PROJECT_BOARD_*` environment variables
    ///
    /// Variables from a `.env` file are loaded first if the file exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::prefixed(ENV_PREFIX).from_env::<Config>()?;

        Ok(config)
    }

    #[cfg(test)]
    fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(pairs)?;
        Ok(config)
    }

    /// Apply command line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        identity_file: Option<PathBuf>,
        log_file: Option<PathBuf>,
    ) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if let Some(identity_file) = identity_file {
            self.identity_file = identity_file;
        }
        if let Some(log_file) = log_file {
            self.log_file = log_file;
        }
        self
    }

    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}
