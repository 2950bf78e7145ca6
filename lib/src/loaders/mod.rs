//! One loader per artifact.
//!
//! Each loader reads its artifact front to back and publishes the `*-size`
//! region of every list before the list itself. Loaders come in two forms:
//! `load_*` opens the artifact file, `publish_*` takes an already open
//! [`RecordReader`](routestore_artifacts::RecordReader) over any byte stream.

pub mod edges;
pub mod graph;
pub mod names;
pub mod nodes;
pub mod rtree;
pub mod timestamp;

pub use edges::{load_original_edges, publish_original_edges};
pub use graph::{load_graph, GraphCounts, GraphSource, HsgrGraphSource};
pub use names::{load_names, publish_names, NamesCounts};
pub use nodes::{load_nodes, publish_nodes};
pub use rtree::{load_rtree, publish_rtree};
pub use timestamp::{load_timestamp, publish_timestamp};

use routestore_artifacts::Record;

use crate::errors::{DatastoreError, Result};
use crate::region::RegionName;
use crate::store::RegionStore;

/// Byte length of a region holding `count` elements of `elem` bytes.
pub(crate) fn region_len(region: RegionName, count: usize, elem: usize) -> Result<usize> {
    count
        .checked_mul(elem)
        .ok_or_else(|| DatastoreError::Allocation {
            region,
            size: usize::MAX,
            reason: format!("{count} elements of {elem} bytes overflow the address space"),
        })
}

/// Publish `records` as region `name`, preceded by its size region.
pub(crate) fn publish_list<S, T>(store: &mut S, name: RegionName, records: &[T]) -> Result<()>
where
    S: RegionStore,
    T: Record,
{
    if let Some(size) = name.size_region() {
        store.publish_scalar(size, records.len() as u64)?;
    }
    let mut region = store.publish(name, region_len(name, records.len(), T::SIZE)?)?;
    for (out, record) in region.chunks_exact_mut(T::SIZE).zip(records) {
        record.encode(out);
    }
    Ok(())
}
