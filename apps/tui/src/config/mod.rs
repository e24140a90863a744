mod settings;

pub use settings::{init_app_config, AppConfig};
