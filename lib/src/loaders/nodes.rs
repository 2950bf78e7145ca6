//! Node coordinates.

use std::io::Read;
use std::path::Path;

use log::{debug, info};
use routestore_artifacts::{Coordinate, NodeRecord, Record, RecordReader};

use super::region_len;
use crate::errors::Result;
use crate::region::RegionName;
use crate::store::RegionStore;

pub fn load_nodes<S: RegionStore>(store: &mut S, path: &Path) -> Result<u32> {
    info!("Loading node coordinates from {}", path.display());
    let mut reader = RecordReader::open(path)?;
    publish_nodes(store, &mut reader)
}

/// Convert `[u32 n][n × NodeRecord]` into `coordinate-list`. Returns `n`.
pub fn publish_nodes<S, R>(store: &mut S, reader: &mut RecordReader<R>) -> Result<u32>
where
    S: RegionStore,
    R: Read,
{
    let count = reader.read_u32("node count")?;
    store.publish_scalar(RegionName::CoordinateListSize, count as u64)?;
    let len = region_len(RegionName::CoordinateList, count as usize, Coordinate::SIZE)?;
    let mut coordinates = store.publish(RegionName::CoordinateList, len)?;
    let slots = coordinates.chunks_exact_mut(Coordinate::SIZE);
    for (out, node) in slots.zip(reader.records::<NodeRecord>(count)) {
        Coordinate::from(node?).encode(out);
    }
    debug!("Published {} coordinates", count);
    Ok(count)
}
