//! Key-value persistence
//!
//! Best-effort string storage for the wallet, inventory and settings. A store
//! that is unavailable (private browsing, quota, no window) reads as empty and
//! swallows writes; callers never see an error.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Port for string persistence used by the economy and settings.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// In-process store, used natively and in tests
#[derive(Debug)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RefCell::default(),
            available: true,
        }
    }

    /// A store that behaves like blocked browser storage
    pub fn unavailable() -> Self {
        Self {
            entries: RefCell::default(),
            available: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        if !self.available {
            return None;
        }
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if !self.available {
            log::warn!("Storage unavailable, dropping write to {key}");
            return;
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::KeyValueStore;

    /// Browser LocalStorage
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocalStore;

    impl LocalStore {
        fn storage() -> Option<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
        }
    }

    impl KeyValueStore for LocalStore {
        fn get(&self, key: &str) -> Option<String> {
            let storage = Self::storage()?;
            match storage.get_item(key) {
                Ok(value) => value,
                Err(_) => {
                    log::warn!("LocalStorage read failed for {key}");
                    None
                }
            }
        }

        fn set(&self, key: &str, value: &str) {
            let Some(storage) = Self::storage() else {
                log::warn!("LocalStorage unavailable, dropping write to {key}");
                return;
            };
            if storage.set_item(key, value).is_err() {
                log::warn!("LocalStorage write failed for {key}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing"), None);
        store.set("rudolph_wallet", "42");
        assert_eq!(store.get("rudolph_wallet").as_deref(), Some("42"));
        store.set("rudolph_wallet", "43");
        assert_eq!(store.get("rudolph_wallet").as_deref(), Some("43"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unavailable_store_degrades() {
        let store = MemoryStore::unavailable();
        store.set("rudolph_wallet", "42");
        assert_eq!(store.get("rudolph_wallet"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_shared_handles_see_same_data() {
        let store = Rc::new(MemoryStore::new());
        let other = Rc::clone(&store);
        other.set("k", "v");
        assert_eq!(KeyValueStore::get(&store, "k").as_deref(), Some("v"));
        assert_eq!((&*store).get("k").as_deref(), Some("v"));
    }
}
