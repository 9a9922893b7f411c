//! Preview handles for captured receipts
//!
//! The edit dialog shows the captured asset through a preview URL. A handle is
//! acquired when an asset enters the pipeline and released when it is dropped, so
//! every exit path (cancel, replacement, completion, teardown) frees it.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use receipt_core::ImageAsset;

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: AtomicU64,
    live: Mutex<HashSet<u64>>,
}

impl RegistryInner {
    fn live(&self) -> MutexGuard<'_, HashSet<u64>> {
        // A panic while holding the lock cannot leave the set half-updated
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Tracks the preview handles that are currently alive.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<RegistryInner>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a preview for `asset`. Released when the handle is dropped.
    pub fn acquire(&self, asset: &ImageAsset) -> PreviewHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.live().insert(id);

        let url = format!("preview://{}/{}", id, asset.filename);
        tracing::trace!(preview_id = id, url = %url, "Acquired preview");

        PreviewHandle {
            id,
            url,
            registry: Arc::clone(&self.inner),
        }
    }

    /// Number of previews not yet released.
    pub fn live_count(&self) -> usize {
        self.inner.live().len()
    }
}

/// Preview of one captured asset. Dropping it releases the preview.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    url: String,
    registry: Arc<RegistryInner>,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.live().remove(&self.id);
        tracing::trace!(preview_id = self.id, "Released preview");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> ImageAsset {
        ImageAsset::new(vec![1u8], "image/jpeg", name)
    }

    #[test]
    fn test_acquire_and_release() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(&asset("a.jpg"));
        assert_eq!(registry.live_count(), 1);
        assert!(handle.url().starts_with("preview://"));
        assert!(handle.url().ends_with("/a.jpg"));

        drop(handle);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_handles_are_unique() {
        let registry = PreviewRegistry::new();
        let first = registry.acquire(&asset("a.jpg"));
        let second = registry.acquire(&asset("a.jpg"));
        assert_ne!(first.url(), second.url());
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn test_replacing_a_handle_releases_the_old_one() {
        let registry = PreviewRegistry::new();
        let mut current = registry.acquire(&asset("a.jpg"));
        let first_url = current.url().to_string();
        current = registry.acquire(&asset("b.jpg"));
        assert_eq!(registry.live_count(), 1);
        assert_ne!(current.url(), first_url);
        assert!(current.url().ends_with("/b.jpg"));
        drop(current);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let registry = PreviewRegistry::new();
        let clone = registry.clone();
        let _handle = clone.acquire(&asset("a.jpg"));
        assert_eq!(registry.live_count(), 1);
    }
}
