//! File-backed shared regions.
//!
//! Every region is a file named after its [`RegionName`] inside the store
//! directory. Placing the directory on a tmpfs (`/dev/shm`) makes the files
//! plain shared memory that any process can map by name.

use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{debug, error, info};
use memmap2::{Mmap, MmapMut};

use super::RegionStore;
use crate::errors::{DatastoreError, Result};
use crate::region::RegionName;

/// Where the CLI publishes regions unless told otherwise.
pub const DEFAULT_STORE_DIR: &str = "/dev/shm/routestore";

const LOCK_FILE: &str = ".routestore.lock";

/// Region store writing one memory-mapped file per region.
///
/// Holds an exclusive lock on the store directory for its whole lifetime, so
/// two loaders never write the same store at once.
#[derive(Debug)]
pub struct ShmStore {
    dir: PathBuf,
    published: BTreeSet<RegionName>,
    // keep the interprocess lock alive for the lifetime of this store
    _lock_file: File,
}

impl ShmStore {
    /// Open (creating if needed) the store directory and take its lock.
    pub fn open<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let lock_path = dir.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)?;
        if let Err(e) = lock_file.try_lock_exclusive() {
            return Err(DatastoreError::StoreLocked {
                path: lock_path,
                reason: e.to_string(),
            });
        }
        // a stale completion marker from an earlier run must not outlive a
        // run that fails part way
        match fs::remove_file(region_path(&dir, RegionName::LayoutVersion)) {
            Ok(()) => debug!("Removed layout-version left by a previous run"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!("Opened region store at {:?}", dir);
        Ok(ShmStore {
            dir,
            published: BTreeSet::new(),
            _lock_file: lock_file,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Regions published through this handle.
    pub fn published(&self) -> impl Iterator<Item = RegionName> + '_ {
        self.published.iter().copied()
    }

    fn allocate(&self, name: RegionName, size: usize) -> std::io::Result<ShmRegion> {
        let staged = self.dir.join(format!(".{}.tmp", name.as_str()));
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&staged)?;
        let map = match map_staged(&file, size) {
            Ok(map) => map,
            Err(e) => {
                let _ = fs::remove_file(&staged);
                return Err(e);
            }
        };
        Ok(ShmRegion {
            map,
            staged,
            target: region_path(&self.dir, name),
        })
    }
}

fn map_staged(file: &File, size: usize) -> std::io::Result<Option<MmapMut>> {
    if size == 0 {
        return Ok(None);
    }
    // reserve the blocks now so a full tmpfs fails here instead of
    // faulting on first write
    file.allocate(size as u64)?;
    file.set_len(size as u64)?;
    Ok(Some(unsafe { MmapMut::map_mut(file)? }))
}

impl RegionStore for ShmStore {
    type Region = ShmRegion;

    fn publish(&mut self, name: RegionName, size: usize) -> Result<ShmRegion> {
        if self.published.contains(&name) {
            return Err(DatastoreError::AlreadyPublished(name));
        }
        let region = self
            .allocate(name, size)
            .map_err(|e| DatastoreError::Allocation {
                region: name,
                size,
                reason: e.to_string(),
            })?;
        self.published.insert(name);
        debug!("Published region {} ({} bytes)", name, size);
        Ok(region)
    }
}

/// Writable mapping of one published region.
///
/// The region is written under a staging name and only appears under its
/// real name once the handle is dropped, so readers never attach to a
/// half-written region.
#[derive(Debug)]
pub struct ShmRegion {
    // None for zero-sized regions, which cannot be mapped
    map: Option<MmapMut>,
    staged: PathBuf,
    target: PathBuf,
}

impl ShmRegion {
    fn commit(&mut self) -> std::io::Result<()> {
        if let Some(map) = &self.map {
            map.flush()?;
        }
        // replace atomically; readers of the previous file keep their mapping
        fs::rename(&self.staged, &self.target)
    }
}

impl Drop for ShmRegion {
    fn drop(&mut self) {
        if let Err(e) = self.commit() {
            error!(
                "Cannot move {} into place as {}: {}",
                self.staged.display(),
                self.target.display(),
                e
            );
        }
    }
}

impl Deref for ShmRegion {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match &self.map {
            Some(m) => m,
            None => &[],
        }
    }
}

impl DerefMut for ShmRegion {
    fn deref_mut(&mut self) -> &mut [u8] {
        match &mut self.map {
            Some(m) => m,
            None => &mut [],
        }
    }
}

fn region_path(dir: &Path, name: RegionName) -> PathBuf {
    dir.join(name.as_str())
}

/// Summary of one region found in a store directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    pub name: RegionName,
    pub size: u64,
    /// blake3 digest of the region bytes, hex encoded.
    pub digest: String,
}

/// List the regions present in the store at `dir`, in [`RegionName::ALL`] order.
///
/// Read-only; does not take the store lock.
pub fn inspect(dir: &Path) -> Result<Vec<RegionInfo>> {
    let mut out = Vec::new();
    for name in RegionName::ALL {
        let path = region_path(dir, name);
        if !path.exists() {
            continue;
        }
        let f = File::open(&path)?;
        let size = f.metadata()?.len();
        let mut hasher = blake3::Hasher::new();
        if size > 0 {
            let map = unsafe { Mmap::map(&f)? };
            hasher.update(&map);
        }
        out.push(RegionInfo {
            name,
            size,
            digest: hasher.finalize().to_hex().to_string(),
        });
    }
    Ok(out)
}

/// Copy out the bytes of region `name`, or `None` if it was never published.
pub fn read_region(dir: &Path, name: RegionName) -> Result<Option<Vec<u8>>> {
    let path = region_path(dir, name);
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(fs::read(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_writes_through_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ShmStore::open(dir.path()).unwrap();
        {
            let mut r = store.publish(RegionName::Timestamp, 3).unwrap();
            r.copy_from_slice(b"n/a");
        }
        store
            .publish_scalar(RegionName::TimestampSize, 3)
            .unwrap();
        assert_eq!(
            read_region(dir.path(), RegionName::Timestamp).unwrap(),
            Some(b"n/a".to_vec())
        );
        assert_eq!(
            read_region(dir.path(), RegionName::TimestampSize).unwrap(),
            Some(3u64.to_le_bytes().to_vec())
        );
        assert!(!dir.path().join(".timestamp.tmp").exists());
    }

    #[test]
    fn region_appears_only_after_handle_drop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ShmStore::open(dir.path()).unwrap();
        let mut r = store.publish(RegionName::Timestamp, 3).unwrap();
        r.copy_from_slice(b"abc");
        assert!(!dir.path().join("timestamp").exists());
        assert!(dir.path().join(".timestamp.tmp").exists());
        assert_eq!(read_region(dir.path(), RegionName::Timestamp).unwrap(), None);
        drop(r);
        assert_eq!(
            read_region(dir.path(), RegionName::Timestamp).unwrap(),
            Some(b"abc".to_vec())
        );
        assert!(!dir.path().join(".timestamp.tmp").exists());
    }

    #[test]
    fn failed_reservation_leaves_no_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ShmStore::open(dir.path()).unwrap();
        let err = store.publish(RegionName::RSearchTree, 1 << 62).unwrap_err();
        assert!(
            matches!(
                err,
                DatastoreError::Allocation {
                    region: RegionName::RSearchTree,
                    ..
                }
            ),
            "{err}"
        );
        assert!(!dir.path().join(".r-search-tree.tmp").exists());
        assert!(!dir.path().join("r-search-tree").exists());
        // the name was never published, so a retry is allowed
        store.publish(RegionName::RSearchTree, 8).unwrap();
    }

    #[test]
    fn vanished_store_dir_is_an_allocation_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("store");
        let mut store = ShmStore::open(&root).unwrap();
        fs::remove_dir_all(&root).unwrap();
        let err = store.publish_scalar(RegionName::Checksum, 1).unwrap_err();
        assert!(matches!(err, DatastoreError::Allocation { .. }), "{err}");
        assert_eq!(store.published().count(), 0);
    }

    #[test]
    fn open_clears_previous_layout_version() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = ShmStore::open(dir.path()).unwrap();
            store.publish_scalar(RegionName::Checksum, 7).unwrap();
            store.publish_scalar(RegionName::LayoutVersion, 1).unwrap();
        }
        let _store = ShmStore::open(dir.path()).unwrap();
        assert_eq!(
            read_region(dir.path(), RegionName::LayoutVersion).unwrap(),
            None
        );
        assert!(read_region(dir.path(), RegionName::Checksum).unwrap().is_some());
    }

    #[test]
    fn zero_sized_region_is_an_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ShmStore::open(dir.path()).unwrap();
        let r = store.publish(RegionName::CoordinateList, 0).unwrap();
        assert!(r.is_empty());
        drop(r);
        let meta = fs::metadata(dir.path().join("coordinate-list")).unwrap();
        assert_eq!(meta.len(), 0);
    }

    #[test]
    fn second_publish_of_a_name_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ShmStore::open(dir.path()).unwrap();
        store.publish_scalar(RegionName::Checksum, 1).unwrap();
        let err = store.publish_scalar(RegionName::Checksum, 2).unwrap_err();
        assert!(matches!(
            err,
            DatastoreError::AlreadyPublished(RegionName::Checksum)
        ));
        assert_eq!(store.published().collect::<Vec<_>>(), vec![RegionName::Checksum]);
    }

    #[test]
    fn inspect_lists_published_regions_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ShmStore::open(dir.path()).unwrap();
        store.publish_scalar(RegionName::Checksum, 7).unwrap();
        store.publish(RegionName::NamesList, 0).unwrap();
        let infos = inspect(dir.path()).unwrap();
        let names: Vec<_> = infos.iter().map(|i| i.name).collect();
        assert_eq!(names, vec![RegionName::NamesList, RegionName::Checksum]);
        assert_eq!(infos[1].size, 8);
        assert_eq!(
            infos[1].digest,
            blake3::hash(&7u64.to_le_bytes()).to_hex().to_string()
        );
    }
}
