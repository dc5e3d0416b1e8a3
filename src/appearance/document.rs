//! The document's class-token surface that appearance preferences are written to.

use std::collections::BTreeSet;
use std::sync::Mutex;

/// Class tokens on the root element of the active document.
pub trait DocumentSurface: Send + Sync {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
}

/// In-memory class list, used headless and in tests.
#[derive(Debug, Default)]
pub struct ClassList {
    classes: Mutex<BTreeSet<String>>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted snapshot of the current tokens.
    pub fn classes(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.classes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentSurface for ClassList {
    fn add_class(&self, class: &str) {
        self.lock().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.lock().remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.lock().contains(class)
    }
}
