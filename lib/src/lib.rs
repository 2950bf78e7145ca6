//! routestore publishes a preprocessed routing dataset into named shared
//! memory regions, where a query server can attach to it without parsing
//! anything.
//!
//! The pieces:
//!
//! - [`region`]: the fixed region names and their sizes.
//! - [`store`]: the [`RegionStore`] trait, the shared memory store and an
//!   in-memory fake.
//! - [`loaders`]: one loader per artifact file.
//! - [`loader`]: the [`DataStoreLoader`] that checks inputs and runs the
//!   loaders in order.
//! - [`config`]: artifact paths, built directly or read from a JSON file.
//!
//! ```no_run
//! use routestore::{config, DataStoreLoader, ShmStore, DEFAULT_STORE_DIR};
//! use std::path::Path;
//!
//! # fn main() -> routestore::Result<()> {
//! let paths = config::load_paths(Path::new("berlin.json"))?;
//! let mut store = ShmStore::open(DEFAULT_STORE_DIR)?;
//! let summary = DataStoreLoader::new(&mut store).load(&paths)?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod loader;
pub mod loaders;
pub mod region;
pub mod store;

pub use config::{ArtifactPaths, DatastoreConfig};
pub use errors::{DatastoreError, Result};
pub use loader::{preflight, DataStoreLoader, LoadSummary};
pub use loaders::{GraphSource, HsgrGraphSource};
pub use region::RegionName;
pub use store::{MemoryStore, RegionStore, ShmStore, DEFAULT_STORE_DIR};
