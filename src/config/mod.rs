pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_file};
pub use types::{ClientConfig, DEFAULT_BASE_URL};
