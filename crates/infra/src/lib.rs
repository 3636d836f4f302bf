//! Infrastructure layer: collection storage, legacy files, config, and the
//! warehouse session that ties the ledgers to their stores.

pub mod config;
pub mod legacy;
pub mod session;
pub mod store;


pub use config::{AppConfig, ConfigError};
pub use legacy::LegacySnapshot;
pub use session::{Warehouse, WarehouseError, WarehouseResult, WarehouseStores};
pub use store::{CollectionStore, InMemoryStore, JsonLinesStore, StoreError};
