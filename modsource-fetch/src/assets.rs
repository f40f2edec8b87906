//! Matching release assets to download slots.

use modsource_catalog::{AssetDownload, PlatformAssets};

use crate::types::ReleaseAsset;

/// Classify a release's assets into per-platform slots by case-insensitive
/// name prefix. The first asset matching a prefix claims the slot; later
/// assets with the same prefix are not considered. Returns `None` when no
/// slot is populated.
pub fn classify_platform_assets(assets: &[ReleaseAsset]) -> Option<PlatformAssets> {
    let mut slots = PlatformAssets::default();
    for asset in assets {
        let name = asset.name.to_ascii_lowercase();
        if name.starts_with("windows-") {
            fill(&mut slots.windows, asset);
        } else if name.starts_with("linux-") {
            fill(&mut slots.linux, asset);
        } else if name.starts_with("macos-") {
            fill(&mut slots.macos, asset);
        }
    }
    if slots.is_empty() { None } else { Some(slots) }
}

/// Find the single texture-pack archive asset (`assets.zip`).
pub fn find_archive_asset(assets: &[ReleaseAsset]) -> Option<AssetDownload> {
    assets
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case("assets.zip"))
        .map(to_download)
}

/// Find the release's `metadata.json` asset (case-insensitive exact match).
pub fn find_metadata_asset(assets: &[ReleaseAsset]) -> Option<&ReleaseAsset> {
    assets
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case("metadata.json"))
}

fn fill(slot: &mut Option<AssetDownload>, asset: &ReleaseAsset) {
    if slot.is_none() {
        *slot = Some(to_download(asset));
    }
}

fn to_download(asset: &ReleaseAsset) -> AssetDownload {
    AssetDownload {
        url: asset.browser_download_url.clone(),
        download_count: asset.download_count,
    }
}
