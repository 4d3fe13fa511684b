use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use whirr_query::SourceConfig;
use whirr_types::Source;

use crate::error::{ServerError, ServerResult};

/// Server configuration, loadable from a TOML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Source priority order; the first match wins on multi-source keys.
    pub sources: Vec<String>,
    /// Sources whose output has personal-contact attributes suppressed.
    pub filtered_sources: Vec<String>,
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4343".parse().expect("valid literal"),
            sources: vec!["TEST".to_string()],
            filtered_sources: Vec::new(),
            max_connections: 256,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Build the query engine's source configuration.
    pub fn source_config(&self) -> ServerResult<SourceConfig> {
        let mut priority = Vec::new();
        for name in &self.sources {
            priority.push(
                Source::new(name).map_err(|e| ServerError::Config(e.to_string()))?,
            );
        }
        let mut config = SourceConfig::new(priority);
        for name in &self.filtered_sources {
            let source =
                Source::new(name).map_err(|e| ServerError::Config(e.to_string()))?;
            config = config.with_filtered(source);
        }
        Ok(config)
    }
}
