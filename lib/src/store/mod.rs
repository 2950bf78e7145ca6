//! Region stores: where loaders publish named regions.
//!
//! A loader never talks to shared memory directly. It asks a [`RegionStore`]
//! for a writable region of an exact size under a fixed [`RegionName`] and
//! copies its bytes in. Two stores are provided:
//!
//! - [`ShmStore`]: one memory-mapped file per region inside a directory on a
//!   shared-memory filesystem (`/dev/shm` by default), attachable by the
//!   query server.
//! - [`MemoryStore`]: an in-process fake that records what was published and
//!   in which order, used by tests.
//!
//! Each name may be published at most once per store. Zero-sized regions are
//! legal.

pub mod memory;
pub mod shm;

pub use memory::{MemoryRegion, MemoryStore};
pub use shm::{inspect, read_region, RegionInfo, ShmRegion, ShmStore, DEFAULT_STORE_DIR};

use std::ops::DerefMut;

use crate::errors::Result;
use crate::region::{RegionName, SCALAR_SIZE};

/// Something that hands out named, writable regions.
pub trait RegionStore {
    /// Writable handle for one region. Dropping it ends the write.
    type Region: DerefMut<Target = [u8]>;

    /// Create region `name` of exactly `size` zeroed bytes.
    fn publish(&mut self, name: RegionName, size: usize) -> Result<Self::Region>;

    /// Publish a single little-endian `u64` as region `name`.
    fn publish_scalar(&mut self, name: RegionName, value: u64) -> Result<()> {
        let mut region = self.publish(name, SCALAR_SIZE)?;
        region.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }
}

/// Decode a scalar region's bytes.
pub fn decode_scalar(bytes: &[u8]) -> Option<u64> {
    let raw: [u8; SCALAR_SIZE] = bytes.try_into().ok()?;
    Some(u64::from_le_bytes(raw))
}
