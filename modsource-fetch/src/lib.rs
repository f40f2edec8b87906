//! Release fetching and catalog assembly for modsource.

pub mod assets;
pub mod client;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod types;
pub mod version;

pub use client::GithubClient;
pub use error::SyncError;
pub use pipeline::{SyncOptions, build_catalog, lint};
pub use source::ReleaseSource;
pub use types::{Release, ReleaseAsset, ReleaseMetadata};
