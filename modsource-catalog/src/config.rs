//! Loading and validation of the mod-source configuration file.
//!
//! The file is human-curated YAML. Parsing accepts every per-entry field as
//! optional; [`validate`] then converts the raw mapping into a
//! [`SourceConfig`] whose required fields are guaranteed present, so the rest
//! of the pipeline never re-checks them.

use std::path::Path;

use thiserror::Error;

use crate::types::{RawConfig, RawEntry, Repo, SourceConfig, SourceEntry};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
    #[error("entry '{entry}' is missing required field '{field}'")]
    MissingField { entry: String, field: &'static str },
}

/// Load and validate the configuration file.
pub fn load_config(path: &Path) -> Result<SourceConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let raw: RawConfig = serde_yml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;
    validate(raw)
}

/// Validate a raw configuration, converting it to typed presence.
///
/// The same rules apply to mods and texture packs: display name, description,
/// authors, and tags are always required; repo owner/name are required unless
/// the entry is an external link, in which case a supported-games list is
/// required instead. The first violation fails the whole run.
pub fn validate(raw: RawConfig) -> Result<SourceConfig, ConfigError> {
    let mut mods = indexmap::IndexMap::new();
    for (name, entry) in raw.mods {
        let validated = validate_entry(&name, entry)?;
        mods.insert(name, validated);
    }

    let mut texture_packs = indexmap::IndexMap::new();
    for (name, entry) in raw.texture_packs {
        let validated = validate_entry(&name, entry)?;
        texture_packs.insert(name, validated);
    }

    Ok(SourceConfig {
        name: raw.metadata.name,
        mods,
        texture_packs,
    })
}

fn validate_entry(name: &str, entry: RawEntry) -> Result<SourceEntry, ConfigError> {
    let missing = |field: &'static str| ConfigError::MissingField {
        entry: name.to_string(),
        field,
    };

    let display_name = entry.display_name.ok_or_else(|| missing("display_name"))?;
    let description = entry.description.ok_or_else(|| missing("description"))?;
    let authors = entry.authors.ok_or_else(|| missing("authors"))?;
    let tags = entry.tags.ok_or_else(|| missing("tags"))?;

    let repo = match (&entry.external_link, entry.repo_owner, entry.repo_name) {
        (Some(_), _, _) => {
            if entry.supported_games.is_none() {
                return Err(missing("supported_games"));
            }
            None
        }
        (None, Some(owner), Some(name)) => Some(Repo { owner, name }),
        (None, None, _) => return Err(missing("repo_owner")),
        (None, _, None) => return Err(missing("repo_name")),
    };

    Ok(SourceEntry {
        display_name,
        description,
        authors,
        tags,
        website_url: entry.website_url,
        external_link: entry.external_link,
        supported_games: entry.supported_games,
        repo,
        ignore_versions: entry.ignore_versions,
        release_date_override: entry.release_date_override,
        cover_art_url: entry.cover_art_url,
        thumbnail_art_url: entry.thumbnail_art_url,
        per_game_config: entry.per_game_config,
    })
}
