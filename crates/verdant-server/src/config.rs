use std::env;
use std::path::PathBuf;
use verdant_core::{ENV_VERDANT_LISTEN, ENV_VERDANT_REGISTRY_DIR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: String,
    pub registry_dirs: Vec<PathBuf>,
    pub instance_fixtures: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            registry_dirs: vec![PathBuf::from("fixtures/registry")],
            instance_fixtures: None,
        }
    }
}

impl ServerConfig {
    /// Defaults overlaid with environment variables. CLI flags win over
    /// both; the binary applies them after this.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(listen) = env::var(ENV_VERDANT_LISTEN) {
            let trimmed = listen.trim();
            if !trimmed.is_empty() {
                config.listen = trimmed.to_string();
            }
        }
        if let Ok(dirs) = env::var(ENV_VERDANT_REGISTRY_DIR) {
            let parsed: Vec<PathBuf> = dirs
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
            if !parsed.is_empty() {
                config.registry_dirs = parsed;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_bundled_fixtures() {
        let config = ServerConfig::default();
        assert_eq!(config.listen, "127.0.0.1:8080");
        assert_eq!(config.registry_dirs, vec![PathBuf::from("fixtures/registry")]);
    }
}
