use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::anyhow;
use wasm_bindgen::JsValue;

/// Key/value persistence the session marker lives in.
pub trait SessionStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove_item(key)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Rc<T> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove_item(key)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    #[default]
    LocalStorage,
    SessionStorage,
}

pub fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.session_storage().ok().flatten()
}

/// `window.localStorage` or `window.sessionStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStore {
    persistence: StorageType,
}

impl BrowserStore {
    pub fn with_local_storage(mut self) -> Self {
        self.persistence = StorageType::LocalStorage;
        self
    }

    pub fn with_session_storage(mut self) -> Self {
        self.persistence = StorageType::SessionStorage;
        self
    }

    pub fn is_available(&self) -> bool {
        self.storage().is_ok()
    }

    fn storage(&self) -> anyhow::Result<web_sys::Storage> {
        match self.persistence {
            StorageType::LocalStorage => {
                let Some(storage) = local_storage() else {
                    anyhow::bail!("no local storage available");
                };
                Ok(storage)
            }
            StorageType::SessionStorage => {
                let Some(storage) = session_storage() else {
                    anyhow::bail!("no session storage available");
                };
                Ok(storage)
            }
        }
    }
}

impl SessionStore for BrowserStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage().ok()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err: JsValue| anyhow!("failed to save {key}: {err:?}"))
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|err: JsValue| anyhow!("failed to remove {key}: {err:?}"))
    }
}

/// In-process store for hosts without web storage (desktop and mobile
/// builds). Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[cfg(test)]
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        self
    }
}

impl SessionStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
