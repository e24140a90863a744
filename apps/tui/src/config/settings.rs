use crate::loader::DataSource;
use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use heatmap_core::DEFAULT_DATA_URL;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SVG_WIDTH: f64 = 1200.0;
const DEFAULT_SVG_HEIGHT: f64 = 600.0;

/// Runtime configuration assembled from `.env`, the environment and CLI overrides
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub source: DataSource,
    pub timeout: Duration,
    pub log_file: PathBuf,
    pub svg_path: PathBuf,
    pub svg_width: f64,
    pub svg_height: f64,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Remote(DEFAULT_DATA_URL.to_string()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_file: PathBuf::from("heatmap.log"),
            svg_path: PathBuf::from("heatmap.svg"),
            svg_width: DEFAULT_SVG_WIDTH,
            svg_height: DEFAULT_SVG_HEIGHT,
            debug: false,
        }
    }
}

/// Initializes the application configuration
pub fn init_app_config() -> Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    let defaults = AppConfig::default();

    // A local file wins over a URL when both are set
    let source = match (env::var("HEATMAP_FILE"), env::var("HEATMAP_URL")) {
        (Ok(path), _) if !path.trim().is_empty() => DataSource::File(PathBuf::from(path)),
        (_, Ok(url)) if !url.trim().is_empty() => DataSource::Remote(url.trim().to_string()),
        _ => defaults.source,
    };

    let timeout_secs: u64 = env_parse("HEATMAP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
    if timeout_secs == 0 {
        return Err(eyre!("HEATMAP_TIMEOUT_SECS must be greater than zero"));
    }

    Ok(AppConfig {
        source,
        timeout: Duration::from_secs(timeout_secs),
        log_file: env::var("HEATMAP_LOG_FILE").map_or(defaults.log_file, PathBuf::from),
        svg_path: env::var("HEATMAP_SVG_PATH").map_or(defaults.svg_path, PathBuf::from),
        svg_width: env_parse("HEATMAP_SVG_WIDTH", DEFAULT_SVG_WIDTH)?,
        svg_height: env_parse("HEATMAP_SVG_HEIGHT", DEFAULT_SVG_HEIGHT)?,
        debug: env::var("DEBUG").is_ok_and(|v| v != "0" && !v.is_empty()),
    })
}

/// Read and parse an environment variable, falling back when it is unset
fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| eyre!("Invalid value for {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_public_dataset() {
        let config = AppConfig::default();
        assert_eq!(
            config.source,
            DataSource::Remote(DEFAULT_DATA_URL.to_string())
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn env_parse_falls_back_and_rejects_garbage() {
        let missing: u64 = env_parse("HEATMAP_TEST_SURELY_UNSET_KEY", 7).unwrap();
        assert_eq!(missing, 7);

        env::set_var("HEATMAP_TEST_BAD_NUMBER", "abc");
        let bad: Result<u64> = env_parse("HEATMAP_TEST_BAD_NUMBER", 1);
        assert!(bad.is_err());

        env::set_var("HEATMAP_TEST_GOOD_NUMBER", " 42 ");
        let good: u64 = env_parse("HEATMAP_TEST_GOOD_NUMBER", 1).unwrap();
        assert_eq!(good, 42);
    }
}
