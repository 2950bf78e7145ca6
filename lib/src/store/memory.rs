//! In-process region store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use super::{decode_scalar, RegionStore};
use crate::errors::{DatastoreError, Result};
use crate::region::RegionName;

#[derive(Debug, Default)]
struct Inner {
    regions: BTreeMap<RegionName, Vec<u8>>,
    order: Vec<RegionName>,
    allocated: usize,
    limit: Option<usize>,
}

/// Region store backed by plain vectors.
///
/// Region contents become visible through [`MemoryStore::region`] once the
/// writable handle is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses to hand out more than `bytes` bytes in total.
    pub fn with_capacity_limit(bytes: usize) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().limit = Some(bytes);
        store
    }

    /// Contents of region `name`, if it was published.
    pub fn region(&self, name: RegionName) -> Option<Vec<u8>> {
        self.inner.borrow().regions.get(&name).cloned()
    }

    /// Value of a scalar region.
    pub fn scalar(&self, name: RegionName) -> Option<u64> {
        self.inner
            .borrow()
            .regions
            .get(&name)
            .and_then(|b| decode_scalar(b))
    }

    /// Names in the order they were published.
    pub fn publish_order(&self) -> Vec<RegionName> {
        self.inner.borrow().order.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes handed out so far.
    pub fn allocated(&self) -> usize {
        self.inner.borrow().allocated
    }
}

impl RegionStore for MemoryStore {
    type Region = MemoryRegion;

    fn publish(&mut self, name: RegionName, size: usize) -> Result<MemoryRegion> {
        let mut inner = self.inner.borrow_mut();
        if inner.regions.contains_key(&name) {
            return Err(DatastoreError::AlreadyPublished(name));
        }
        if let Some(limit) = inner.limit {
            let left = limit.saturating_sub(inner.allocated);
            if size > left {
                return Err(DatastoreError::Allocation {
                    region: name,
                    size,
                    reason: format!("only {left} bytes left in memory store"),
                });
            }
        }
        inner.allocated += size;
        inner.order.push(name);
        inner.regions.insert(name, vec![0u8; size]);
        Ok(MemoryRegion {
            name,
            buf: vec![0u8; size],
            inner: Rc::clone(&self.inner),
        })
    }
}

/// Writable handle returned by [`MemoryStore::publish`].
#[derive(Debug)]
pub struct MemoryRegion {
    name: RegionName,
    buf: Vec<u8>,
    inner: Rc<RefCell<Inner>>,
}

impl Deref for MemoryRegion {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf
    }
}

impl DerefMut for MemoryRegion {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl Drop for MemoryRegion {
    fn drop(&mut self) {
        if let Some(slot) = self.inner.borrow_mut().regions.get_mut(&self.name) {
            *slot = std::mem::take(&mut self.buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_visible_after_handle_drop() {
        let mut store = MemoryStore::new();
        {
            let mut r = store.publish(RegionName::Timestamp, 3).unwrap();
            r.copy_from_slice(b"n/a");
            assert_eq!(store.region(RegionName::Timestamp).unwrap(), vec![0, 0, 0]);
        }
        assert_eq!(store.region(RegionName::Timestamp).unwrap(), b"n/a");
    }

    #[test]
    fn scalar_roundtrip_and_order() {
        let mut store = MemoryStore::new();
        store
            .publish_scalar(RegionName::Checksum, 0xDEAD_BEEF)
            .unwrap();
        store.publish(RegionName::NamesList, 0).unwrap();
        assert_eq!(store.scalar(RegionName::Checksum), Some(0xDEAD_BEEF));
        assert_eq!(store.region(RegionName::NamesList), Some(vec![]));
        assert_eq!(
            store.publish_order(),
            vec![RegionName::Checksum, RegionName::NamesList]
        );
        assert_eq!(store.allocated(), 8);
    }

    #[test]
    fn names_are_write_once() {
        let mut store = MemoryStore::new();
        store.publish_scalar(RegionName::NamesIndexSize, 1).unwrap();
        let err = store
            .publish_scalar(RegionName::NamesIndexSize, 2)
            .unwrap_err();
        assert!(matches!(
            err,
            DatastoreError::AlreadyPublished(RegionName::NamesIndexSize)
        ));
        assert_eq!(store.scalar(RegionName::NamesIndexSize), Some(1));
    }

    #[test]
    fn capacity_limit_yields_allocation_error() {
        let mut store = MemoryStore::with_capacity_limit(10);
        store.publish(RegionName::NamesIndex, 8).unwrap();
        let err = store.publish(RegionName::NamesList, 3).unwrap_err();
        assert!(matches!(err, DatastoreError::Allocation { size: 3, .. }));
        assert!(store.region(RegionName::NamesList).is_none());
    }
}
