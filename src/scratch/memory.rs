use std::collections::HashMap;

use super::{ScratchError, ScratchStore};

/// In-memory scratch store
#[derive(Debug, Clone)]
pub struct MemoryScratch<T> {
    buffers: HashMap<String, Vec<T>>,
}

impl<T> MemoryScratch<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            buffers: HashMap::new(),
        }
    }

    /// Number of keys with at least one append
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether nothing was appended yet
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl<T> Default for MemoryScratch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ScratchStore<T> for MemoryScratch<T> {
    fn append(&mut self, key: &str, rows: &[T]) -> Result<(), ScratchError> {
        self.buffers
            .entry(key.to_string())
            .or_default()
            .extend_from_slice(rows);
        Ok(())
    }

    fn read_all(&self, key: &str) -> Result<Vec<T>, ScratchError> {
        Ok(self.buffers.get(key).cloned().unwrap_or_default())
    }

    fn exists(&self, key: &str) -> bool {
        self.buffers.contains_key(key)
    }
}
