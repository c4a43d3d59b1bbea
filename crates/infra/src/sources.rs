//! Upstream collaborators: inventory snapshot and vendor offer providers.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use restock_core::Sku;
use restock_inventory::{InventoryItem, VendorOffer};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    /// Whether trying again later can succeed. Unreadable or malformed
    /// snapshots stay broken until someone fixes them.
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Unavailable(_))
    }
}

/// Provider of the current inventory rows.
pub trait InventorySource: Send + Sync + 'static {
    fn fetch_items(&self) -> Result<Vec<InventoryItem>, SourceError>;
}

/// Provider of vendor offers, per SKU.
pub trait VendorOfferSource: Send + Sync + 'static {
    fn offers_for(&self, sku: &Sku) -> Result<Vec<VendorOffer>, SourceError>;
}

impl<S> InventorySource for Arc<S>
where
    S: InventorySource + ?Sized,
{
    fn fetch_items(&self) -> Result<Vec<InventoryItem>, SourceError> {
        (**self).fetch_items()
    }
}

impl<S> VendorOfferSource for Arc<S>
where
    S: VendorOfferSource + ?Sized,
{
    fn offers_for(&self, sku: &Sku) -> Result<Vec<VendorOffer>, SourceError> {
        (**self).offers_for(sku)
    }
}

/// Inventory rows plus offers keyed by SKU, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub items: Vec<InventoryItem>,
    #[serde(default)]
    pub offers: HashMap<Sku, Vec<VendorOffer>>,
}

/// In-memory source for tests/dev, with optional failure injection.
#[derive(Debug, Default)]
pub struct InMemorySource {
    snapshot: Snapshot,
    failing_item_fetches: AtomicU32,
    failing_offer_skus: HashSet<Sku>,
}

impl InMemorySource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            ..Default::default()
        }
    }

    pub fn from_parts(items: Vec<InventoryItem>, offers: HashMap<Sku, Vec<VendorOffer>>) -> Self {
        Self::new(Snapshot { items, offers })
    }

    /// Make the next `n` calls to `fetch_items` fail.
    pub fn fail_next_item_fetches(self, n: u32) -> Self {
        self.failing_item_fetches.store(n, Ordering::SeqCst);
        self
    }

    /// Make offer lookups for `sku` always fail.
    pub fn fail_offers_for(mut self, sku: impl Into<Sku>) -> Self {
        self.failing_offer_skus.insert(sku.into());
        self
    }
}

impl InventorySource for InMemorySource {
    fn fetch_items(&self) -> Result<Vec<InventoryItem>, SourceError> {
        let remaining = self.failing_item_fetches.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_item_fetches.store(remaining - 1, Ordering::SeqCst);
            return Err(SourceError::Unavailable("injected inventory failure".to_string()));
        }
        Ok(self.snapshot.items.clone())
    }
}

impl VendorOfferSource for InMemorySource {
    fn offers_for(&self, sku: &Sku) -> Result<Vec<VendorOffer>, SourceError> {
        if self.failing_offer_skus.contains(sku) {
            return Err(SourceError::Unavailable(format!(
                "injected offer failure for SKU {sku}"
            )));
        }
        Ok(self.snapshot.offers.get(sku).cloned().unwrap_or_default())
    }
}

/// JSON snapshot file (`{"items": [...], "offers": {"SKU": [...]}}`).
///
/// `fetch_items` reads the file and keeps that read's offers; `offers_for`
/// answers from them, so items and offers of one cycle always come from the
/// same version of the file. Edits are picked up by the next `fetch_items`.
#[derive(Debug)]
pub struct JsonFileSource {
    path: PathBuf,
    offers: Mutex<Option<HashMap<Sku, Vec<VendorOffer>>>>,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offers: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Snapshot, SourceError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| SourceError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}

impl InventorySource for JsonFileSource {
    fn fetch_items(&self) -> Result<Vec<InventoryItem>, SourceError> {
        let snapshot = self.load()?;
        *self.offers.lock().unwrap_or_else(|e| e.into_inner()) = Some(snapshot.offers);
        Ok(snapshot.items)
    }
}

impl VendorOfferSource for JsonFileSource {
    fn offers_for(&self, sku: &Sku) -> Result<Vec<VendorOffer>, SourceError> {
        let mut cached = self.offers.lock().unwrap_or_else(|e| e.into_inner());
        if cached.is_none() {
            *cached = Some(self.load()?.offers);
        }
        Ok(cached
            .as_ref()
            .and_then(|offers| offers.get(sku))
            .cloned()
            .unwrap_or_default())
    }
}
