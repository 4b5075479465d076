//! Configuration: raw TOML structure and multi-source loading.

mod file_config;
mod loader;

pub use file_config::{
    AdminSection, FileConfig, LogSection, ServerSection, StoreBackend, StoreSection,
};
pub use loader::ConfigLoader;
