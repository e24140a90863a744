use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "heatmap",
    version,
    about = "Monthly global land-surface temperature heatmap"
)]
pub struct CliArgs {
    /// Print dataset stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override dataset URL
    #[arg(long, value_name = "URL", conflicts_with = "file")]
    pub url: Option<String>,

    /// Load the dataset from a local JSON file instead of fetching it
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write the rendered heatmap as SVG (headless mode)
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// SVG width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<f64>,

    /// SVG height in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<f64>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.url {
            std::env::set_var("HEATMAP_URL", url);
            std::env::remove_var("HEATMAP_FILE");
        }
        if let Some(file) = &self.file {
            std::env::set_var("HEATMAP_FILE", file);
        }
        if let Some(secs) = self.timeout {
            std::env::set_var("HEATMAP_TIMEOUT_SECS", secs.to_string());
        }
        if let Some(path) = &self.svg {
            std::env::set_var("HEATMAP_SVG_PATH", path);
        }
        if let Some(width) = self.width {
            std::env::set_var("HEATMAP_SVG_WIDTH", width.to_string());
        }
        if let Some(height) = self.height {
            std::env::set_var("HEATMAP_SVG_HEIGHT", height.to_string());
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    /// Headless output was asked for explicitly
    pub const fn wants_headless(&self) -> bool {
        self.headless || self.json || self.svg.is_some()
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headless_flags() {
        let args = CliArgs::parse_from(["heatmap", "--json", "--svg", "out.svg", "--width", "800"]);
        assert!(args.json);
        assert!(args.wants_headless());
        assert_eq!(args.svg, Some(PathBuf::from("out.svg")));
        assert_eq!(args.width, Some(800.0));
    }

    #[test]
    fn url_and_file_conflict() {
        let result = CliArgs::try_parse_from(["heatmap", "--url", "http://x", "--file", "a.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn help_lists_flags() {
        let help = CliArgs::help_text();
        assert!(help.contains("--headless"));
        assert!(help.contains("--timeout"));
    }
}
