//! Shared context passed to modules

use crate::store::CatalogStore;

/// Shared context available to all modules
#[derive(Debug, Default)]
pub struct Context {
    /// Catalog state and the actions that mutate it
    pub store: CatalogStore,

    /// Last text copied to the clipboard
    pub clipboard: Option<String>,

    /// Gateway display string
    pub gateway: String,

    /// Animation frame counter, advanced on every tick
    pub frame: usize,
}

impl Context {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// Set clipboard content
    pub fn set_clipboard(&mut self, content: String) {
        self.clipboard = Some(content);
    }
}
