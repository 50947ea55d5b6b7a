//! Output slot for the user's asset list
//!
//! A refresh takes a ticket before it starts fetching. Only the holder of
//! the newest ticket may commit, so a slow fetch for a chain the user has
//! already switched away from cannot overwrite the newer list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::{BridgeError, BridgeResult};
use crate::types::Asset;
use crate::log_warn;

/// Generation handed out by [`AssetListStore::begin_refresh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

pub struct AssetListStore {
    generation: AtomicU64,
    assets: RwLock<Vec<Asset>>,
}

impl AssetListStore {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            assets: RwLock::new(Vec::new()),
        }
    }

    /// Start a refresh; invalidates every earlier ticket
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Publish `assets` if `ticket` is still the newest; returns whether it was written
    pub fn commit(&self, ticket: RefreshTicket, assets: Vec<Asset>) -> BridgeResult<bool> {
        let mut slot = self
            .assets
            .write()
            .map_err(|_| BridgeError::internal("Asset list lock poisoned"))?;

        if !self.is_current(ticket) {
            log_warn!(
                "store",
                "Discarding stale asset list",
                generation = ticket.0,
                latest = self.generation.load(Ordering::SeqCst)
            );
            return Ok(false);
        }

        *slot = assets;
        Ok(true)
    }

    pub fn snapshot(&self) -> BridgeResult<Vec<Asset>> {
        self.assets
            .read()
            .map(|assets| assets.clone())
            .map_err(|_| BridgeError::internal("Asset list lock poisoned"))
    }
}

impl Default for AssetListStore {
    fn default() -> Self {
        Self::new()
    }
}
