use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("LODESTONE_").split("_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{MatchStrategy, SelectorStrategy};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[backend]
url = "http://tickets:8080"

[allocator]
url = "http://allocator:8443/v1/allocations"

[[profiles]]
name = "block_sumo"
pool_name = "block_sumo"
fleet_name = "block-sumo"
min_players = 2
max_players = 12
strategy = "countdown"
selector = "exclusive_match"
"#;

    #[test]
    fn test_load_config_from_str_minimal() {
        let config = load_config_from_str(MINIMAL).unwrap();
        assert_eq!(config.backend.url, "http://tickets:8080");
        assert_eq!(config.backend.timeout_secs, 5);
        assert!(config.notifier.is_none());
        assert_eq!(config.director.min_cycle_interval_ms, 1000);
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.profiles[0].strategy, MatchStrategy::Countdown);
        assert_eq!(config.profiles[0].selector, SelectorStrategy::ExclusiveMatch);
    }

    #[test]
    fn test_server_section_defaults() {
        let config = load_config_from_str(MINIMAL).unwrap();
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.port, 8080);

        let toml = format!("{MINIMAL}\n[server]\nhost = \"127.0.0.1\"\nport = 9999\n");
        let config = load_config_from_str(&toml).unwrap();
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_load_config_from_str_missing_backend() {
        let toml = r#"
[allocator]
url = "http://allocator:8443"
profiles = []
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{MINIMAL}").unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.profiles[0].name, "block_sumo");
    }

    #[test]
    fn test_notifier_section_parsed() {
        let toml = format!(
            "{MINIMAL}\n[notifier]\nurl = \"http://notify:9090\"\nmax_in_flight = 8\n"
        );
        let config = load_config_from_str(&toml).unwrap();
        let notifier = config.notifier.unwrap();
        assert_eq!(notifier.url, "http://notify:9090");
        assert_eq!(notifier.max_in_flight, 8);
        assert_eq!(notifier.timeout_secs, 5);
    }
}
