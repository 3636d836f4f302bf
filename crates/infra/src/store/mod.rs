//! Collection storage boundary.
//!
//! Every collection (products, customers, invoices, dispatches, consignment)
//! is loaded whole at startup and rewritten whole after each successful
//! mutation. Lookups by key are served from the in-memory catalogs.

pub mod json_lines;
pub mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

pub use json_lines::JsonLinesStore;
pub use memory::InMemoryStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored record could not be decoded.
    #[error("cannot decode {path} line {line}: {message}")]
    Decode {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A record could not be encoded.
    #[error("cannot encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// A legacy text record is malformed.
    #[error("legacy {file} line {line}: {message}")]
    Legacy {
        file: String,
        line: usize,
        message: String,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Load-all / overwrite-all storage for one collection.
pub trait CollectionStore<T>: Send + Sync {
    fn load(&self) -> Result<Vec<T>, StoreError>;

    /// Replace the stored collection with `records`.
    fn save(&self, records: &[T]) -> Result<(), StoreError>;
}

impl<T, S> CollectionStore<T> for Arc<S>
where
    S: CollectionStore<T> + ?Sized,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        (**self).load()
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        (**self).save(records)
    }
}
