//! Persistent user settings stored as `robolabel.toml` in the app directory.

mod io;
mod types;

pub use io::{config_path, load_from, load_or_default, save, save_to_path};
pub use types::{
    AppSettings, BatchSettings, ConfigError, DatasetSettings, ServerSettings,
};

/// Settings file name inside the `.robolabel` directory.
pub const CONFIG_FILE_NAME: &str = "robolabel.toml";
