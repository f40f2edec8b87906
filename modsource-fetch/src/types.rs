//! Wire types for the GitHub releases API and the per-release metadata
//! document mods publish alongside their builds.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One release as returned by `GET /repos/{owner}/{repo}/releases`.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One uploaded asset on a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub download_count: u64,
}

/// The `metadata.json` document attached to every release.
///
/// `supportedGames` is required but deserialized as optional so the pipeline
/// can report its absence with the mod and version in the message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseMetadata {
    pub settings: Option<serde_json::Value>,
    pub supported_games: Option<Vec<String>>,
}

/// Default settings object for releases whose metadata omits `settings`.
pub fn default_settings() -> serde_json::Value {
    serde_json::json!({
        "configOverride": "",
        "shareVanillaSaves": false,
    })
}
