//! The sync pipeline: fetch releases, filter versions, resolve metadata,
//! classify assets, and assemble the catalog.
//!
//! Mods and texture packs run through the same resolution path; only the
//! asset classifier and the shape of the emitted version records differ.
//! Entries are processed strictly sequentially in declaration order, and any
//! fatal error aborts the whole run before anything is written.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use semver::Version;

use modsource_catalog::{
    Catalog, ModSourceInfo, ModVersion, PerGameInfo, SourceConfig, SourceEntry, TexturePackInfo,
    TexturePackVersion,
};

use crate::assets::{classify_platform_assets, find_archive_asset, find_metadata_asset};
use crate::error::SyncError;
use crate::source::ReleaseSource;
use crate::types::{Release, ReleaseAsset, default_settings};
use crate::version::{is_ignored, normalize_tag, parse_rules};

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Game identifier published when no release declares any supported game.
    pub default_game: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            default_game: "jak1".to_string(),
        }
    }
}

/// Validate everything that can be checked without the network: the config
/// has already parsed and passed field validation by the time it is a
/// [`SourceConfig`], so what remains is ignore-rule syntax.
pub fn lint(config: &SourceConfig) -> Result<(), SyncError> {
    for (name, entry) in config.mods.iter().chain(config.texture_packs.iter()) {
        parse_rules(name, &entry.ignore_versions)?;
    }
    Ok(())
}

/// Resolve every configured entry into a fresh catalog document.
pub async fn build_catalog<S: ReleaseSource>(
    source: &S,
    config: &SourceConfig,
    options: &SyncOptions,
) -> Result<Catalog, SyncError> {
    let mut catalog = Catalog::new(config.name.as_str());

    for (name, entry) in &config.mods {
        log::info!("resolving mod '{name}'");
        let (common, versions) =
            resolve_entry(source, name, entry, options, classify_platform_assets).await?;
        let versions = versions
            .into_iter()
            .map(|v| ModVersion {
                version: v.version,
                published_date: v.published,
                supported_games: v.supported_games,
                settings: v.settings,
                assets: v.assets,
            })
            .collect();
        catalog.mods.insert(
            name.clone(),
            ModSourceInfo {
                display_name: entry.display_name.clone(),
                description: entry.description.clone(),
                authors: entry.authors.clone(),
                tags: entry.tags.clone(),
                website_url: common.website_url,
                supported_games: common.supported_games,
                versions,
                cover_art_url: entry.cover_art_url.clone(),
                thumbnail_art_url: entry.thumbnail_art_url.clone(),
                per_game_config: common.per_game_config,
                external_link: entry.external_link.clone(),
            },
        );
    }

    for (name, entry) in &config.texture_packs {
        log::info!("resolving texture pack '{name}'");
        let (common, versions) =
            resolve_entry(source, name, entry, options, find_archive_asset).await?;
        let versions = versions
            .into_iter()
            .map(|v| TexturePackVersion {
                version: v.version,
                published_date: v.published,
                download_url: v.assets.url,
                download_count: v.assets.download_count,
            })
            .collect();
        catalog.texture_packs.insert(
            name.clone(),
            TexturePackInfo {
                display_name: entry.display_name.clone(),
                description: entry.description.clone(),
                authors: entry.authors.clone(),
                tags: entry.tags.clone(),
                website_url: common.website_url,
                versions,
                cover_art_url: entry.cover_art_url.clone(),
                thumbnail_art_url: entry.thumbnail_art_url.clone(),
                per_game_config: common.per_game_config,
                external_link: entry.external_link.clone(),
            },
        );
    }

    Ok(catalog)
}

/// Per-entry output shared by mods and texture packs.
struct EntryCommon {
    website_url: Option<String>,
    supported_games: Vec<String>,
    per_game_config: IndexMap<String, PerGameInfo>,
}

/// One accepted release, with its classified assets of whatever shape the
/// caller's classifier produces.
struct ResolvedVersion<A> {
    version: String,
    published: DateTime<Utc>,
    supported_games: Vec<String>,
    settings: serde_json::Value,
    assets: A,
}

/// Resolve one entry: list releases, filter versions, fetch per-release
/// metadata, and merge per-game configuration.
///
/// External-link entries skip the network entirely; their supported-games
/// list comes from the config and their version list is empty.
async fn resolve_entry<S, A>(
    source: &S,
    name: &str,
    entry: &SourceEntry,
    options: &SyncOptions,
    classify: impl Fn(&[ReleaseAsset]) -> Option<A>,
) -> Result<(EntryCommon, Vec<ResolvedVersion<A>>), SyncError>
where
    S: ReleaseSource,
{
    if entry.external_link.is_some() {
        let mut games = entry.supported_games.clone().unwrap_or_default();
        if games.is_empty() {
            games.push(options.default_game.clone());
        }
        for game in &games {
            check_art_urls(name, entry, game)?;
        }
        let per_game_config = build_per_game_config(entry, &games, &IndexMap::new());
        return Ok((
            EntryCommon {
                website_url: entry.website_url.clone(),
                supported_games: games,
                per_game_config,
            },
            Vec::new(),
        ));
    }

    let Some(repo) = &entry.repo else {
        // Validation guarantees this; reported as the same error it would
        // have produced rather than panicking.
        return Err(modsource_catalog::ConfigError::MissingField {
            entry: name.to_string(),
            field: "repo_owner",
        }
        .into());
    };

    let rules = parse_rules(name, &entry.ignore_versions)?;
    let mut releases = source.list_releases(&repo.owner, &repo.name).await?;
    // The API usually returns newest-first, but nothing guarantees it; the
    // published version list must not depend on listing order.
    releases.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let mut games: Vec<String> = Vec::new();
    let mut earliest: IndexMap<String, DateTime<Utc>> = IndexMap::new();
    let mut versions = Vec::new();

    for release in &releases {
        let tag = normalize_tag(&release.tag_name);
        let version = match Version::parse(tag) {
            Ok(v) => v,
            Err(e) => {
                log::warn!(
                    "skipping release '{}' of '{name}': invalid version: {e}",
                    release.tag_name
                );
                continue;
            }
        };
        if is_ignored(&rules, &version) {
            log::info!("ignoring version {version} of '{name}'");
            continue;
        }

        let (settings, supported_games) =
            fetch_release_metadata(source, name, &version, release).await?;

        for game in &supported_games {
            if !games.iter().any(|g| g == game) {
                games.push(game.clone());
            }
            check_art_urls(name, entry, game)?;
            let first_seen = earliest.entry(game.clone()).or_insert(release.published_at);
            if release.published_at < *first_seen {
                *first_seen = release.published_at;
            }
        }

        let Some(assets) = classify(&release.assets) else {
            log::info!("dropping version {version} of '{name}': no downloadable assets");
            continue;
        };

        versions.push(ResolvedVersion {
            version: version.to_string(),
            published: release.published_at,
            supported_games,
            settings,
            assets,
        });
    }

    if games.is_empty() {
        games.push(options.default_game.clone());
    }

    let per_game_config = build_per_game_config(entry, &games, &earliest);
    let website_url = entry
        .website_url
        .clone()
        .or_else(|| Some(format!("https://github.com/{}/{}", repo.owner, repo.name)));

    Ok((
        EntryCommon {
            website_url,
            supported_games: games,
            per_game_config,
        },
        versions,
    ))
}

/// Locate, fetch, and parse a release's `metadata.json`. Every failure here
/// is fatal to the run: a release without the file, a non-200 fetch, a parse
/// failure, or a missing `supportedGames` list.
async fn fetch_release_metadata<S: ReleaseSource>(
    source: &S,
    name: &str,
    version: &Version,
    release: &Release,
) -> Result<(serde_json::Value, Vec<String>), SyncError> {
    let Some(meta_asset) = find_metadata_asset(&release.assets) else {
        return Err(SyncError::MissingMetadataAsset {
            entry: name.to_string(),
            version: version.to_string(),
        });
    };

    let text = match source.fetch_text(&meta_asset.browser_download_url).await {
        Ok(text) => text,
        Err(SyncError::Status { status, .. }) => {
            return Err(SyncError::MetadataFetch {
                entry: name.to_string(),
                version: version.to_string(),
                status,
            });
        }
        Err(e) => return Err(e),
    };

    let metadata: crate::types::ReleaseMetadata =
        serde_json::from_str(&text).map_err(|e| SyncError::MetadataParse {
            entry: name.to_string(),
            version: version.to_string(),
            source: e,
        })?;

    let supported_games =
        metadata
            .supported_games
            .ok_or_else(|| SyncError::MissingSupportedGames {
                entry: name.to_string(),
                version: version.to_string(),
            })?;

    Ok((metadata.settings.unwrap_or_else(default_settings), supported_games))
}

/// Art URLs must be resolvable for every supported game: either a top-level
/// URL on the entry or a per-game override.
fn check_art_urls(name: &str, entry: &SourceEntry, game: &str) -> Result<(), SyncError> {
    let overrides = entry.per_game_config.get(game);
    if entry.cover_art_url.is_none()
        && overrides.and_then(|o| o.cover_art_url.as_ref()).is_none()
    {
        return Err(SyncError::MissingArtUrl {
            entry: name.to_string(),
            game: game.to_string(),
            field: "cover_art_url",
        });
    }
    if entry.thumbnail_art_url.is_none()
        && overrides.and_then(|o| o.thumbnail_art_url.as_ref()).is_none()
    {
        return Err(SyncError::MissingArtUrl {
            entry: name.to_string(),
            game: game.to_string(),
            field: "thumbnail_art_url",
        });
    }
    Ok(())
}

/// Build the published per-game configuration for every aggregated game.
///
/// Release-date precedence: entry-level override, then per-game override,
/// then the earliest publish timestamp observed for that game.
fn build_per_game_config(
    entry: &SourceEntry,
    games: &[String],
    earliest: &IndexMap<String, DateTime<Utc>>,
) -> IndexMap<String, PerGameInfo> {
    let mut config = IndexMap::new();
    for game in games {
        let overrides = entry.per_game_config.get(game);
        let release_date = entry
            .release_date_override
            .clone()
            .or_else(|| overrides.and_then(|o| o.release_date_override.clone()))
            .or_else(|| earliest.get(game).map(|d| d.to_rfc3339()));
        config.insert(
            game.clone(),
            PerGameInfo {
                release_date,
                cover_art_url: overrides.and_then(|o| o.cover_art_url.clone()),
                thumbnail_art_url: overrides.and_then(|o| o.thumbnail_art_url.clone()),
            },
        );
    }
    config
}
