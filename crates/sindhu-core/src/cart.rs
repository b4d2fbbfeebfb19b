//! Client-side shopping cart
//!
//! The cart is a JSON array of full [`Product`] records kept under a single
//! key in client-local storage. It is never synchronized with the server.
//! Every mutation rewrites the whole list and broadcasts a [`CartEvent`] so
//! other views in the same process can re-read it.
//!
//! Quantities are not tracked: a product is either in the cart or not, and
//! the total is one effective price per entry.

use crate::{CatalogError, Result};
use dashmap::DashMap;
use sindhu_types::Product;
use std::path::PathBuf;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Storage key holding the serialized cart
pub const CART_KEY: &str = "cart";

/// Key/value persistence in the shape of browser local storage
pub trait CartStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-lifetime storage
#[derive(Default)]
pub struct MemoryCartStorage {
    items: DashMap<String, String>,
}

impl MemoryCartStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryCartStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory
pub struct FileCartStorage {
    dir: PathBuf,
}

impl FileCartStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CartStorage for FileCartStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }
}

/// Change notification sent after every successful mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    Added(i64),
    Removed(i64),
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The product id was already in the cart; nothing changed
    AlreadyPresent,
}

pub struct Cart<S> {
    storage: S,
    events: broadcast::Sender<CartEvent>,
}

impl<S: CartStorage> Cart<S> {
    pub fn new(storage: S) -> Self {
        let (events, _) = broadcast::channel(32);
        Self { storage, events }
    }

    /// Listen for cart changes
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Current cart contents. Unreadable data degrades to an empty cart.
    pub fn items(&self) -> Result<Vec<Product>> {
        let Some(raw) = self.storage.get_item(CART_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!("Failed to parse cart data, starting empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub fn add(&self, product: &Product) -> Result<AddOutcome> {
        let mut items = self.items()?;
        if items.iter().any(|item| item.id == product.id) {
            debug!("Product {} already in cart", product.id);
            return Ok(AddOutcome::AlreadyPresent);
        }

        items.push(product.clone());
        self.save(&items)?;
        self.notify(CartEvent::Added(product.id));
        Ok(AddOutcome::Added)
    }

    /// Returns whether the product was in the cart
    pub fn remove(&self, product_id: i64) -> Result<bool> {
        let mut items = self.items()?;
        let before = items.len();
        items.retain(|item| item.id != product_id);
        if items.len() == before {
            return Ok(false);
        }

        self.save(&items)?;
        self.notify(CartEvent::Removed(product_id));
        Ok(true)
    }

    pub fn clear(&self) -> Result<()> {
        self.save(&[])?;
        self.notify(CartEvent::Cleared);
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.items()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Sum of effective prices, one per entry
    pub fn total(&self) -> Result<i64> {
        cart_total(&self.items()?).ok_or(CatalogError::TotalOverflow)
    }

    fn save(&self, items: &[Product]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.storage.set_item(CART_KEY, &raw)
    }

    fn notify(&self, event: CartEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }
}

/// Discount price when set, list price otherwise, summed over entries.
/// `None` when the sum does not fit in an `i64`.
pub fn cart_total(items: &[Product]) -> Option<i64> {
    items
        .iter()
        .map(Product::effective_price)
        .try_fold(0i64, i64::checked_add)
}
