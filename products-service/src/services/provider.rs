use crate::services::store::DocumentStore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared slot holding the current database handle, if any.
///
/// Handlers take one snapshot per request with [`ConnectionProvider::current`]
/// and work on that; only the connection supervisor installs or clears it.
#[derive(Clone, Default)]
pub struct ConnectionProvider {
    handle: Arc<RwLock<Option<Arc<dyn DocumentStore>>>>,
}

impl ConnectionProvider {
    /// A provider with no connection yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            handle: Arc::new(RwLock::new(Some(store))),
        }
    }

    pub async fn current(&self) -> Option<Arc<dyn DocumentStore>> {
        self.handle.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.handle.read().await.is_some()
    }

    pub async fn install(&self, store: Arc<dyn DocumentStore>) {
        *self.handle.write().await = Some(store);
    }

    pub async fn clear(&self) {
        *self.handle.write().await = None;
    }
}
