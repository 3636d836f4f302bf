use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CollectionStore, StoreError};

/// In-memory collection store for tests/dev.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    records: RwLock<Vec<T>>,
    saves: AtomicUsize,
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed `save` calls.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl<T: Clone> InMemoryStore<T> {
    pub fn snapshot(&self) -> Vec<T> {
        match self.records.read() {
            Ok(records) => records.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollectionStore<T> for InMemoryStore<T>
where
    T: Clone + Send + Sync,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.clone())
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let mut stored = self.records.write().map_err(|_| StoreError::Poisoned)?;
        *stored = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_replaces_records_and_counts() {
        let store = InMemoryStore::with_records(vec![1, 2]);
        store.save(&[3]).unwrap();
        assert_eq!(store.load().unwrap(), vec![3]);
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn poisoned_lock_is_an_error() {
        let store = std::sync::Arc::new(InMemoryStore::with_records(vec![1]));
        let writer = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.records.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.save(&[2]), Err(StoreError::Poisoned)));
        assert!(matches!(store.load(), Err(StoreError::Poisoned)));
        assert_eq!(store.saves(), 0);
    }
}
