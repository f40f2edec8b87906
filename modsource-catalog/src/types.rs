//! Data model types for the mod catalog.
//!
//! Two families live here: the raw configuration schema loaded from YAML
//! (snake_case, everything optional until validated) and the published
//! catalog document (camelCase JSON consumed by the website).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Schema version stamped into every published catalog.
pub const SCHEMA_VERSION: &str = "1.0.0";

// ── Configuration input ─────────────────────────────────────────────────────

/// The raw mod-source configuration file, straight off disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    pub metadata: ConfigMetadata,
    #[serde(default)]
    pub mods: IndexMap<String, RawEntry>,
    #[serde(default)]
    pub texture_packs: IndexMap<String, RawEntry>,
}

/// Top-level metadata section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigMetadata {
    pub name: String,
}

/// One configured mod or texture pack, before validation.
///
/// Every field is optional at parse time; [`crate::config::validate`]
/// converts this into a [`SourceEntry`] with typed presence, so downstream
/// code never re-checks required fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub authors: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub website_url: Option<String>,
    pub external_link: Option<String>,
    pub supported_games: Option<Vec<String>>,
    pub repo_owner: Option<String>,
    pub repo_name: Option<String>,
    #[serde(default)]
    pub ignore_versions: Vec<String>,
    pub release_date_override: Option<String>,
    pub cover_art_url: Option<String>,
    pub thumbnail_art_url: Option<String>,
    #[serde(default)]
    pub per_game_config: IndexMap<String, PerGameOverride>,
}

/// Per-game override bag keyed by supported-game identifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerGameOverride {
    pub cover_art_url: Option<String>,
    pub thumbnail_art_url: Option<String>,
    pub release_date_override: Option<String>,
}

/// A validated configuration: required fields are guaranteed present.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Catalog source name, from `metadata.name`.
    pub name: String,
    pub mods: IndexMap<String, SourceEntry>,
    pub texture_packs: IndexMap<String, SourceEntry>,
}

/// GitHub repository coordinates for a repo-backed entry.
#[derive(Debug, Clone)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

/// A validated mod or texture-pack entry.
///
/// Exactly one of `repo` / `external_link` is populated: validation rejects
/// entries with neither, and external entries are never fetched.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub display_name: String,
    pub description: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub website_url: Option<String>,
    pub external_link: Option<String>,
    /// Required (and only meaningful) when `external_link` is set; for
    /// repo-backed entries the list is aggregated from releases instead.
    pub supported_games: Option<Vec<String>>,
    pub repo: Option<Repo>,
    pub ignore_versions: Vec<String>,
    pub release_date_override: Option<String>,
    pub cover_art_url: Option<String>,
    pub thumbnail_art_url: Option<String>,
    pub per_game_config: IndexMap<String, PerGameOverride>,
}

// ── Published catalog ───────────────────────────────────────────────────────

/// The published catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub schema_version: String,
    pub source_name: String,
    pub mods: IndexMap<String, ModSourceInfo>,
    pub texture_packs: IndexMap<String, TexturePackInfo>,
    /// Stamped only when the catalog content actually changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            source_name: source_name.into(),
            mods: IndexMap::new(),
            texture_packs: IndexMap::new(),
            last_updated: None,
        }
    }
}

/// Resolved metadata for one mod, as published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModSourceInfo {
    pub display_name: String,
    pub description: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    /// Explicit config URL, inferred from the repo, or null for external entries.
    pub website_url: Option<String>,
    /// Union of every game any resolved version supports; never empty.
    pub supported_games: Vec<String>,
    pub versions: Vec<ModVersion>,
    pub cover_art_url: Option<String>,
    pub thumbnail_art_url: Option<String>,
    pub per_game_config: IndexMap<String, PerGameInfo>,
    pub external_link: Option<String>,
}

/// One resolved release of a mod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModVersion {
    /// Normalized semantic version (no leading `v`).
    pub version: String,
    pub published_date: DateTime<Utc>,
    pub supported_games: Vec<String>,
    /// Mod-specific settings object from metadata.json.
    pub settings: serde_json::Value,
    pub assets: PlatformAssets,
}

/// Per-platform download slots; a version with all three empty is never published.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformAssets {
    pub windows: Option<AssetDownload>,
    pub linux: Option<AssetDownload>,
    pub macos: Option<AssetDownload>,
}

impl PlatformAssets {
    pub fn is_empty(&self) -> bool {
        self.windows.is_none() && self.linux.is_none() && self.macos.is_none()
    }
}

/// A downloadable asset URL with its running download count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDownload {
    pub url: String,
    pub download_count: u64,
}

/// Resolved metadata for one texture pack: like [`ModSourceInfo`] but each
/// version carries a single archive instead of per-platform slots, and there
/// is no top-level supported-games aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexturePackInfo {
    pub display_name: String,
    pub description: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub website_url: Option<String>,
    pub versions: Vec<TexturePackVersion>,
    pub cover_art_url: Option<String>,
    pub thumbnail_art_url: Option<String>,
    pub per_game_config: IndexMap<String, PerGameInfo>,
    pub external_link: Option<String>,
}

/// One resolved release of a texture pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexturePackVersion {
    pub version: String,
    pub published_date: DateTime<Utc>,
    pub download_url: String,
    pub download_count: u64,
}

/// Published per-game configuration: resolved release date and art URLs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerGameInfo {
    pub release_date: Option<String>,
    pub cover_art_url: Option<String>,
    pub thumbnail_art_url: Option<String>,
}
