use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::path::PathBuf;

/// Where log records go. The terminal UI owns stdout and stderr while running,
/// so interactive sessions log to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Filter applied when `RUST_LOG` is not set
pub fn default_filter(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("warn,heatmap={level},heatmap_core={level},temperature_heatmap={level}")
}

pub fn init_logging(debug: bool, target: &LogTarget) -> color_eyre::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter(debug)));

    match target {
        LogTarget::Stderr => {
            builder.target(Target::Stderr);
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.target(Target::Pipe(Box::new(file))).write_style(env_logger::WriteStyle::Never);
        }
    }

    builder.try_init()?;
    log::debug!("Logging initialised ({target:?})");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_crate_levels() {
        assert!(default_filter(true).contains("heatmap_core=debug"));
        assert!(default_filter(false).contains("heatmap_core=info"));
        assert!(default_filter(false).starts_with("warn,"));
    }
}
