//! Injected release-listing capability.
//!
//! The pipeline never talks to GitHub directly; it takes a [`ReleaseSource`]
//! so lint mode simply never constructs a client and tests can substitute an
//! in-memory fake.

use crate::error::SyncError;
use crate::types::Release;

/// Capability to list releases for a repository and fetch asset content.
#[allow(async_fn_in_trait)]
pub trait ReleaseSource {
    /// Fetch the full (paginated) release list for a repository.
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, SyncError>;

    /// Fetch the body of an arbitrary URL. A non-200 response is an error.
    async fn fetch_text(&self, url: &str) -> Result<String, SyncError>;
}
