/// Errors that can occur while syncing the catalog.
///
/// Everything here is fatal to the whole run; soft per-release skips
/// (invalid version tag, ignored version, no downloadable assets) are
/// handled with log lines inside the pipeline and never surface as errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by GitHub API after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("GitHub API returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("release {version} of '{entry}' has no metadata.json asset")]
    MissingMetadataAsset { entry: String, version: String },

    #[error("failed to fetch metadata.json for {version} of '{entry}': HTTP {status}")]
    MetadataFetch {
        entry: String,
        version: String,
        status: u16,
    },

    #[error("failed to parse metadata.json for {version} of '{entry}': {source}")]
    MetadataParse {
        entry: String,
        version: String,
        source: serde_json::Error,
    },

    #[error("metadata.json for {version} of '{entry}' is missing 'supportedGames'")]
    MissingSupportedGames { entry: String, version: String },

    #[error("entry '{entry}' has no top-level {field} and no per-game override for game '{game}'")]
    MissingArtUrl {
        entry: String,
        game: String,
        field: &'static str,
    },

    #[error("entry '{entry}' has invalid ignore rule '{rule}': {source}")]
    BadIgnoreRule {
        entry: String,
        rule: String,
        source: semver::Error,
    },

    #[error(transparent)]
    Config(#[from] modsource_catalog::ConfigError),
}
