//! Configuration loaded from `.covstat.toml`.
//!
//! The nearest config file in the current directory or its ancestors is used;
//! command-line flags are layered on top with [`CovstatConfig::merge`].

mod core;
mod loader;

pub use self::core::CovstatConfig;
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_config, CONFIG_FILE_NAME,
};
