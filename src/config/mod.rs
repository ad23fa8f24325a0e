mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

use subscout_common::language;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./subscout.toml",
        "~/.config/subscout/config.toml",
        "/etc/subscout/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    for code in &config.languages {
        if !language::is_valid_code(&code.to_lowercase()) {
            anyhow::bail!("Unknown language code in config: '{}'", code);
        }
    }

    if config.engine.workers == 0 {
        anyhow::bail!("engine.workers must be at least 1");
    }

    if config.engine.sort_order.is_empty() {
        anyhow::bail!("engine.sort_order cannot be empty");
    }

    if config.opensubtitles.username.is_some() != config.opensubtitles.password.is_some() {
        anyhow::bail!("opensubtitles username and password must be set together");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.engine.workers, 4);
        assert_eq!(config.engine.max_depth, 3);
        assert!(!config.engine.multi);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            languages = ["en", "fr"]
            providers = ["opensubtitles"]

            [engine]
            workers = 8
            multi = true
            sort_order = ["language_rank", "content_match_confidence"]

            [opensubtitles]
            api_key = "abc"
            "#,
        )
        .unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.languages, vec!["en", "fr"]);
        assert_eq!(config.engine.workers, 8);
        assert!(config.engine.multi);
        assert_eq!(config.engine.sort_order.len(), 2);
    }

    #[test]
    fn test_bad_language_rejected() {
        let config: Config = toml::from_str(r#"languages = ["klingon"]"#).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config: Config = toml::from_str("[engine]\nworkers = 0").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_credentials_must_pair() {
        let config: Config = toml::from_str("[opensubtitles]\nusername = \"me\"").unwrap();
        assert!(validate_config(&config).is_err());
    }
}
