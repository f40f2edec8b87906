//! Configuration schema, validation, and catalog document for modsource.

pub mod config;
pub mod output;
pub mod types;

pub use config::{ConfigError, load_config, validate};
pub use output::{OutputError, write_if_changed};
pub use types::{
    AssetDownload, Catalog, ModSourceInfo, ModVersion, PerGameInfo, PerGameOverride,
    PlatformAssets, RawConfig, RawEntry, Repo, SCHEMA_VERSION, SourceConfig, SourceEntry,
    TexturePackInfo, TexturePackVersion,
};
