//! Cart persistence
//!
//! A cart is stored under three independent keys: the line items as a JSON array,
//! the active code as a JSON string, and the discount fraction as a plain decimal
//! string. Reads happen once per session; writes happen after every mutation.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

use crate::cart::items::{CartLineItem, CartState, Customization};

/// Key holding the serialised line items.
pub const LINE_ITEMS_KEY: &str = "cart";

/// Key holding the active promo code.
pub const PROMO_CODE_KEY: &str = "promoCode";

/// Key holding the promo discount fraction.
pub const PROMO_DISCOUNT_KEY: &str = "promoDiscount";

/// Errors raised by a cart store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing storage could not be read or written
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    /// A value could not be encoded
    #[error("failed to encode cart value: {0}")]
    Encode(#[from] serde_json::Error),

    /// Storage is disabled or full
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable string key-value storage for a cart.
pub trait CartStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the storage cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, lost when dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` currently holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl CartStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);

        Ok(())
    }
}

/// Store keeping one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl CartStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}

/// Raw values read back from a store, before the promo is matched to the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedCart {
    /// Line items, empty when absent or corrupt
    pub line_items: Vec<CartLineItem>,

    /// Active code, if one was stored
    pub promo_code: Option<String>,
}

/// Write all three keys for `state`. `fraction` is the discount fraction to record.
///
/// # Errors
///
/// Returns the first [`StorageError`] hit; later keys are not attempted.
pub fn save<S: CartStore + ?Sized>(
    store: &mut S,
    state: &CartState,
    fraction: Decimal,
) -> Result<(), StorageError> {
    store.set(LINE_ITEMS_KEY, &serde_json::to_string(&state.line_items)?)?;

    match &state.active_promo {
        Some(promo) => {
            store.set(PROMO_CODE_KEY, &serde_json::to_string(&promo.code)?)?;
            store.set(PROMO_DISCOUNT_KEY, &fraction.normalize().to_string())?;
        }
        None => {
            store.remove(PROMO_CODE_KEY)?;
            store.remove(PROMO_DISCOUNT_KEY)?;
        }
    }

    Ok(())
}

/// Remove all three keys.
///
/// # Errors
///
/// Returns the first [`StorageError`] hit; later keys are not attempted.
pub fn erase<S: CartStore + ?Sized>(store: &mut S) -> Result<(), StorageError> {
    store.remove(LINE_ITEMS_KEY)?;
    store.remove(PROMO_CODE_KEY)?;
    store.remove(PROMO_DISCOUNT_KEY)?;

    Ok(())
}

/// Read the line items and the promo code. Unreadable or corrupt values are logged
/// and treated as absent.
///
/// The stored discount fraction is not read back: the discount is always taken from
/// the catalog's current definition of the code.
pub fn load<S: CartStore + ?Sized>(store: &S) -> PersistedCart {
    let line_items = read(store, LINE_ITEMS_KEY, |raw| serde_json::from_str(raw).ok());
    let promo_code = read(store, PROMO_CODE_KEY, |raw| serde_json::from_str(raw).ok());

    PersistedCart {
        line_items: normalize_line_items(line_items.unwrap_or_default()),
        promo_code,
    }
}

/// Drop zero-quantity rows and merge rows sharing a product, in first-seen order.
///
/// Merged quantities add up; a later row's customisation wins where it has one.
fn normalize_line_items(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let stored = items.len();
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(stored);

    for item in items {
        if item.quantity == 0 {
            continue;
        }

        match merged.iter_mut().find(|m| m.product_id == item.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                existing.customize(Customization {
                    sauce: item.selected_sauce,
                    sides: item.selected_sides,
                });
            }
            None => merged.push(item),
        }
    }

    if merged.len() != stored {
        warn!(stored, kept = merged.len(), "repaired persisted line items");
    }

    merged
}

fn read<S, T, F>(store: &S, key: &'static str, parse: F) -> Option<T>
where
    S: CartStore + ?Sized,
    F: FnOnce(&str) -> Option<T>,
{
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(error) => {
            warn!(key, %error, "failed to read persisted cart value");

            return None;
        }
    };

    let parsed = parse(&raw);

    if parsed.is_none() {
        warn!(key, "ignoring corrupt persisted cart value");
    }

    parsed
}
