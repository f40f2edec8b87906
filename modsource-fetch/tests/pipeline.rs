use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;

use modsource_catalog::{PerGameOverride, Repo, SourceConfig, SourceEntry};
use modsource_fetch::{
    Release, ReleaseAsset, ReleaseSource, SyncError, SyncOptions, build_catalog,
};

/// In-memory release source: canned release lists and asset bodies.
struct FakeSource {
    /// `None` means any listing attempt is a test failure (external entries
    /// must never hit the network).
    releases: Option<Vec<Release>>,
    bodies: HashMap<String, String>,
}

impl FakeSource {
    fn empty() -> Self {
        Self {
            releases: Some(Vec::new()),
            bodies: HashMap::new(),
        }
    }

    fn offline() -> Self {
        Self {
            releases: None,
            bodies: HashMap::new(),
        }
    }

    fn with_release(mut self, release: Release, metadata_body: Option<&str>) -> Self {
        if let Some(body) = metadata_body {
            self.bodies
                .insert(metadata_url(&release.tag_name), body.to_string());
        }
        self.releases.get_or_insert_with(Vec::new).push(release);
        self
    }
}

impl ReleaseSource for FakeSource {
    async fn list_releases(&self, _owner: &str, _repo: &str) -> Result<Vec<Release>, SyncError> {
        match &self.releases {
            Some(releases) => Ok(releases.clone()),
            None => panic!("list_releases called on an offline source"),
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, SyncError> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| SyncError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

fn metadata_url(tag: &str) -> String {
    format!("https://dl.example/{tag}/metadata.json")
}

fn asset(name: &str, url: &str) -> ReleaseAsset {
    ReleaseAsset {
        name: name.to_string(),
        browser_download_url: url.to_string(),
        download_count: 42,
    }
}

fn release(tag: &str, published: DateTime<Utc>, asset_names: &[&str]) -> Release {
    let assets = asset_names
        .iter()
        .map(|name| {
            if *name == "metadata.json" {
                asset(name, &metadata_url(tag))
            } else {
                asset(name, &format!("https://dl.example/{tag}/{name}"))
            }
        })
        .collect();
    Release {
        tag_name: tag.to_string(),
        published_at: published,
        assets,
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn base_entry() -> SourceEntry {
    SourceEntry {
        display_name: "Foo".to_string(),
        description: "A mod".to_string(),
        authors: vec!["alice".to_string()],
        tags: vec!["gameplay".to_string()],
        website_url: None,
        external_link: None,
        supported_games: None,
        repo: Some(Repo {
            owner: "x".to_string(),
            name: "y".to_string(),
        }),
        ignore_versions: vec![],
        release_date_override: None,
        cover_art_url: None,
        thumbnail_art_url: None,
        per_game_config: IndexMap::new(),
    }
}

fn with_art(mut entry: SourceEntry, game: &str) -> SourceEntry {
    entry.per_game_config.insert(
        game.to_string(),
        PerGameOverride {
            cover_art_url: Some(format!("https://img.example/{game}/cover.png")),
            thumbnail_art_url: Some(format!("https://img.example/{game}/thumb.png")),
            release_date_override: None,
        },
    );
    entry
}

fn mod_config(name: &str, entry: SourceEntry) -> SourceConfig {
    let mut mods = IndexMap::new();
    mods.insert(name.to_string(), entry);
    SourceConfig {
        name: "test-source".to_string(),
        mods,
        texture_packs: IndexMap::new(),
    }
}

fn pack_config(name: &str, entry: SourceEntry) -> SourceConfig {
    let mut texture_packs = IndexMap::new();
    texture_packs.insert(name.to_string(), entry);
    SourceConfig {
        name: "test-source".to_string(),
        mods: IndexMap::new(),
        texture_packs,
    }
}

#[tokio::test]
async fn resolves_mod_with_per_game_art() {
    let source = FakeSource::empty().with_release(
        release("v1.0.0", date(2024, 3, 1), &["windows-1.0.0.zip", "metadata.json"]),
        Some(r#"{"supportedGames": ["jak1"]}"#),
    );
    let config = mod_config("foo", with_art(base_entry(), "jak1"));

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();

    let foo = &catalog.mods["foo"];
    assert_eq!(foo.supported_games, vec!["jak1"]);
    assert_eq!(foo.website_url.as_deref(), Some("https://github.com/x/y"));
    assert_eq!(foo.versions.len(), 1);

    let v = &foo.versions[0];
    assert_eq!(v.version, "1.0.0");
    assert!(v.assets.windows.is_some());
    assert!(v.assets.linux.is_none());
    assert!(v.assets.macos.is_none());
    assert_eq!(v.assets.windows.as_ref().unwrap().download_count, 42);
    // Omitted settings fall back to the defaults.
    assert_eq!(v.settings["configOverride"], "");
    assert_eq!(v.settings["shareVanillaSaves"], false);

    let jak1 = &foo.per_game_config["jak1"];
    assert_eq!(jak1.release_date.as_deref(), Some(date(2024, 3, 1).to_rfc3339().as_str()));
    assert!(jak1.cover_art_url.is_some());
}

#[tokio::test]
async fn missing_cover_art_aborts_naming_entry_and_field() {
    let source = FakeSource::empty().with_release(
        release("v1.0.0", date(2024, 3, 1), &["windows-1.0.0.zip", "metadata.json"]),
        Some(r#"{"supportedGames": ["jak1"]}"#),
    );
    let config = mod_config("foo", base_entry());

    let err = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("foo"), "message was: {msg}");
    assert!(msg.contains("cover_art_url"), "message was: {msg}");
}

#[tokio::test]
async fn missing_metadata_asset_aborts() {
    let source = FakeSource::empty().with_release(
        release("v1.0.0", date(2024, 3, 1), &["windows-1.0.0.zip"]),
        None,
    );
    let config = mod_config("foo", with_art(base_entry(), "jak1"));

    let err = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::MissingMetadataAsset { .. }));
    assert!(err.to_string().contains("1.0.0"));
}

#[tokio::test]
async fn missing_supported_games_aborts() {
    let source = FakeSource::empty().with_release(
        release("v1.0.0", date(2024, 3, 1), &["windows-1.0.0.zip", "metadata.json"]),
        Some(r#"{"settings": {}}"#),
    );
    let config = mod_config("foo", with_art(base_entry(), "jak1"));

    let err = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::MissingSupportedGames { .. }));
}

#[tokio::test]
async fn unparseable_metadata_aborts() {
    let source = FakeSource::empty().with_release(
        release("v1.0.0", date(2024, 3, 1), &["windows-1.0.0.zip", "metadata.json"]),
        Some("{ not json"),
    );
    let config = mod_config("foo", with_art(base_entry(), "jak1"));

    let err = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::MetadataParse { .. }));
}

#[tokio::test]
async fn invalid_tag_is_skipped_not_fatal() {
    let source = FakeSource::empty()
        .with_release(release("nightly", date(2024, 4, 1), &["windows-n.zip"]), None)
        .with_release(
            release("v1.0.0", date(2024, 3, 1), &["windows-1.0.0.zip", "metadata.json"]),
            Some(r#"{"supportedGames": ["jak1"]}"#),
        );
    let config = mod_config("foo", with_art(base_entry(), "jak1"));

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    let versions = &catalog.mods["foo"].versions;
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, "1.0.0");
}

#[tokio::test]
async fn ignored_versions_are_never_fetched() {
    // The ignored release has no metadata body registered; reaching for it
    // would fail the run.
    let source = FakeSource::empty()
        .with_release(release("v0.1.0", date(2023, 1, 1), &["windows-0.1.0.zip"]), None)
        .with_release(
            release("v1.2.0", date(2024, 1, 1), &["windows-1.2.0.zip", "metadata.json"]),
            Some(r#"{"supportedGames": ["jak1"]}"#),
        );
    let mut entry = with_art(base_entry(), "jak1");
    entry.ignore_versions = vec!["<1.2.0".to_string()];
    let config = mod_config("foo", entry);

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    let versions = &catalog.mods["foo"].versions;
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, "1.2.0");
}

#[tokio::test]
async fn version_without_platform_assets_is_dropped() {
    let source = FakeSource::empty().with_release(
        release("v1.0.0", date(2024, 3, 1), &["metadata.json", "source.tar.gz"]),
        Some(r#"{"supportedGames": ["jak1"]}"#),
    );
    let config = mod_config("foo", with_art(base_entry(), "jak1"));

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    let foo = &catalog.mods["foo"];
    assert!(foo.versions.is_empty());
    // The release still contributed its supported game to the aggregate.
    assert_eq!(foo.supported_games, vec!["jak1"]);
}

#[tokio::test]
async fn versions_ordered_newest_first_regardless_of_listing_order() {
    let source = FakeSource::empty()
        .with_release(
            release("v1.0.0", date(2023, 1, 1), &["windows-1.0.0.zip", "metadata.json"]),
            Some(r#"{"supportedGames": ["jak1"]}"#),
        )
        .with_release(
            release("v2.0.0", date(2024, 1, 1), &["windows-2.0.0.zip", "metadata.json"]),
            Some(r#"{"supportedGames": ["jak1"]}"#),
        );
    let config = mod_config("foo", with_art(base_entry(), "jak1"));

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    let versions = &catalog.mods["foo"].versions;
    assert_eq!(versions[0].version, "2.0.0");
    assert_eq!(versions[1].version, "1.0.0");
}

#[tokio::test]
async fn earliest_publish_date_wins_for_release_date() {
    let source = FakeSource::empty()
        .with_release(
            release("v2.0.0", date(2024, 6, 1), &["windows-2.0.0.zip", "metadata.json"]),
            Some(r#"{"supportedGames": ["jak1"]}"#),
        )
        .with_release(
            release("v1.0.0", date(2023, 2, 1), &["windows-1.0.0.zip", "metadata.json"]),
            Some(r#"{"supportedGames": ["jak1"]}"#),
        );
    let config = mod_config("foo", with_art(base_entry(), "jak1"));

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    let jak1 = &catalog.mods["foo"].per_game_config["jak1"];
    assert_eq!(jak1.release_date.as_deref(), Some(date(2023, 2, 1).to_rfc3339().as_str()));
}

#[tokio::test]
async fn release_date_override_takes_precedence() {
    let source = FakeSource::empty().with_release(
        release("v1.0.0", date(2024, 3, 1), &["windows-1.0.0.zip", "metadata.json"]),
        Some(r#"{"supportedGames": ["jak1"]}"#),
    );
    let mut entry = with_art(base_entry(), "jak1");
    entry.release_date_override = Some("2020-01-01".to_string());
    let config = mod_config("foo", entry);

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    let jak1 = &catalog.mods["foo"].per_game_config["jak1"];
    assert_eq!(jak1.release_date.as_deref(), Some("2020-01-01"));
}

#[tokio::test]
async fn settings_pass_through_when_present() {
    let source = FakeSource::empty().with_release(
        release("v1.0.0", date(2024, 3, 1), &["windows-1.0.0.zip", "metadata.json"]),
        Some(r#"{"settings": {"difficulty": "hard"}, "supportedGames": ["jak1"]}"#),
    );
    let config = mod_config("foo", with_art(base_entry(), "jak1"));

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    assert_eq!(catalog.mods["foo"].versions[0].settings["difficulty"], "hard");
}

#[tokio::test]
async fn no_releases_falls_back_to_default_game() {
    let source = FakeSource::empty();
    let config = mod_config("foo", with_art(base_entry(), "customgame"));
    let options = SyncOptions {
        default_game: "customgame".to_string(),
    };

    let catalog = build_catalog(&source, &config, &options).await.unwrap();
    let foo = &catalog.mods["foo"];
    assert!(foo.versions.is_empty());
    assert_eq!(foo.supported_games, vec!["customgame"]);
}

#[tokio::test]
async fn external_entry_skips_the_network() {
    let source = FakeSource::offline();
    let mut entry = with_art(base_entry(), "jak1");
    entry.repo = None;
    entry.external_link = Some("https://example.com/mod".to_string());
    entry.supported_games = Some(vec!["jak1".to_string()]);
    let config = mod_config("offsite", entry);

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    let offsite = &catalog.mods["offsite"];
    assert!(offsite.versions.is_empty());
    assert!(offsite.website_url.is_none());
    assert_eq!(offsite.external_link.as_deref(), Some("https://example.com/mod"));
    assert_eq!(offsite.supported_games, vec!["jak1"]);
}

#[tokio::test]
async fn external_entry_with_empty_games_falls_back_to_default() {
    let source = FakeSource::offline();
    let mut entry = with_art(base_entry(), "jak1");
    entry.repo = None;
    entry.external_link = Some("https://example.com/mod".to_string());
    entry.supported_games = Some(vec![]);
    let config = mod_config("offsite", entry);

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    // supportedGames is never empty in the published catalog.
    assert_eq!(catalog.mods["offsite"].supported_games, vec!["jak1"]);
}

#[tokio::test]
async fn texture_pack_uses_single_archive() {
    let source = FakeSource::empty().with_release(
        release("v1.1.0", date(2024, 3, 1), &["assets.zip", "metadata.json"]),
        Some(r#"{"supportedGames": ["jak1"]}"#),
    );
    let config = pack_config("hd-pack", with_art(base_entry(), "jak1"));

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    let pack = &catalog.texture_packs["hd-pack"];
    assert_eq!(pack.versions.len(), 1);
    let v = &pack.versions[0];
    assert_eq!(v.version, "1.1.0");
    assert!(v.download_url.ends_with("assets.zip"));
    assert_eq!(v.download_count, 42);
}

#[tokio::test]
async fn top_level_art_satisfies_every_game() {
    let source = FakeSource::empty().with_release(
        release("v1.0.0", date(2024, 3, 1), &["windows-1.0.0.zip", "metadata.json"]),
        Some(r#"{"supportedGames": ["jak1", "jak2"]}"#),
    );
    let mut entry = base_entry();
    entry.cover_art_url = Some("https://img.example/cover.png".to_string());
    entry.thumbnail_art_url = Some("https://img.example/thumb.png".to_string());
    let config = mod_config("foo", entry);

    let catalog = build_catalog(&source, &config, &SyncOptions::default())
        .await
        .unwrap();
    let foo = &catalog.mods["foo"];
    assert_eq!(foo.supported_games, vec!["jak1", "jak2"]);
    assert_eq!(foo.per_game_config.len(), 2);
}
