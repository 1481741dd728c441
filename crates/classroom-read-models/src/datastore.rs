//! Minimal document stores backing the read models.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Store of documents of one type, addressed by key.
pub trait DocumentStore<D>: Send + Sync {
    /// Inserts or replaces the document under `key`.
    fn save(&self, key: &str, document: D);

    /// Returns a copy of the document under `key`.
    fn get(&self, key: &str) -> Option<D>;

    /// Returns a copy of every document, in no particular order.
    fn list(&self) -> Vec<D>;
}

/// Store holding at most one document.
pub trait SingleDocumentStore<D>: Send + Sync {
    /// Replaces the document.
    fn save(&self, document: D);

    /// Returns a copy of the document, if one was saved.
    fn get(&self) -> Option<D>;
}

/// Thread-safe [`DocumentStore`] kept in memory.
#[derive(Debug)]
pub struct InMemoryDocumentStore<D> {
    documents: RwLock<HashMap<String, D>>,
}

impl<D> InMemoryDocumentStore<D> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn clear(&self) {
        self.documents.write().clear();
    }
}

impl<D> Default for InMemoryDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone + Send + Sync> DocumentStore<D> for InMemoryDocumentStore<D> {
    fn save(&self, key: &str, document: D) {
        self.documents.write().insert(key.to_owned(), document);
    }

    fn get(&self, key: &str) -> Option<D> {
        self.documents.read().get(key).cloned()
    }

    fn list(&self) -> Vec<D> {
        self.documents.read().values().cloned().collect()
    }
}

/// Thread-safe [`SingleDocumentStore`] kept in memory.
#[derive(Debug)]
pub struct InMemorySingleDocumentStore<D> {
    document: RwLock<Option<D>>,
}

impl<D> InMemorySingleDocumentStore<D> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: RwLock::new(None),
        }
    }

    #[cfg(test)]
    fn clear(&self) {
        *self.document.write() = None;
    }
}

impl<D> Default for InMemorySingleDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone + Send + Sync> SingleDocumentStore<D> for InMemorySingleDocumentStore<D> {
    fn save(&self, document: D) {
        *self.document.write() = Some(document);
    }

    fn get(&self) -> Option<D> {
        self.document.read().clone()
    }
}
