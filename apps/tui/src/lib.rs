// Export our modules for use in binaries and tests
pub mod config;
pub mod export;
pub mod loader;
pub mod logging;

pub use config::AppConfig;
pub use loader::{DataSource, LoadError, LoadHandle};
pub use logging::LogTarget;
