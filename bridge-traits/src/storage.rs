//! Key-Value Storage Abstraction
//!
//! Abstracts the host's string key-value store:
//! - Web: `window.localStorage`
//! - Desktop: settings file or SQLite-backed store
//! - Tests: in-memory map (`bridge-headless`)
//!
//! Values are opaque strings; the core serializes its own JSON blobs.
//! Implementations must report write failures (notably quota exhaustion)
//! through [`BridgeError`](crate::error::BridgeError) rather than silently
//! dropping data; the persistence layer degrades on top of that signal.

use async_trait::async_trait;

use crate::error::Result;

/// String key-value persistence.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::KeyValueStore;
///
/// async fn remember(store: &dyn KeyValueStore) -> bridge_traits::error::Result<()> {
///     store.set("jukebox.playlist.v1", "[]").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value. Returns `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, overwriting any previous one.
    ///
    /// Must fail with [`BridgeError::QuotaExceeded`](crate::error::BridgeError)
    /// when the backing store refuses the write for lack of space.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check for a key without retrieving its value.
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
