//! Spatial index, copied verbatim.

use std::io::Read;
use std::path::Path;

use log::{debug, info};
use routestore_artifacts::{RTreeNode, Record, RecordReader};

use super::region_len;
use crate::errors::Result;
use crate::region::RegionName;
use crate::store::RegionStore;

pub fn load_rtree<S: RegionStore>(store: &mut S, path: &Path) -> Result<u32> {
    info!("Loading spatial index from {}", path.display());
    let mut reader = RecordReader::open(path)?;
    publish_rtree(store, &mut reader)
}

/// Bulk copy `[u32 n][n × RTreeNode]` into `r-search-tree`. Returns `n`.
pub fn publish_rtree<S, R>(store: &mut S, reader: &mut RecordReader<R>) -> Result<u32>
where
    S: RegionStore,
    R: Read,
{
    let count = reader.read_u32("tree node count")?;
    store.publish_scalar(RegionName::RSearchTreeSize, count as u64)?;
    let len = region_len(RegionName::RSearchTree, count as usize, RTreeNode::SIZE)?;
    let mut tree = store.publish(RegionName::RSearchTree, len)?;
    reader.read_into(&mut tree, "tree node bytes")?;
    debug!("Published {} tree nodes ({} bytes)", count, len);
    Ok(count)
}
