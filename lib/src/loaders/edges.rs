//! Original edge data, split into three parallel per-edge lists.

use std::io::Read;
use std::path::Path;

use log::{debug, info};
use routestore_artifacts::{OriginalEdgeRecord, RecordReader};

use super::region_len;
use crate::errors::Result;
use crate::region::{RegionName, EDGE_ID_SIZE, TURN_INSTRUCTION_SIZE};
use crate::store::RegionStore;

pub fn load_original_edges<S: RegionStore>(store: &mut S, path: &Path) -> Result<u32> {
    info!("Loading original edges from {}", path.display());
    let mut reader = RecordReader::open(path)?;
    publish_original_edges(store, &mut reader)
}

/// Scatter `[u32 n][n × OriginalEdgeRecord]` into `via-node-list`,
/// `name-id-list` and `turn-instruction-list`. Returns the edge count.
pub fn publish_original_edges<S, R>(store: &mut S, reader: &mut RecordReader<R>) -> Result<u32>
where
    S: RegionStore,
    R: Read,
{
    let count = reader.read_u32("original edge count")?;
    let n = count as usize;
    for size in [
        RegionName::NameIdListSize,
        RegionName::TurnInstructionListSize,
        RegionName::ViaNodeListSize,
    ] {
        store.publish_scalar(size, count as u64)?;
    }

    let mut via_nodes = store.publish(
        RegionName::ViaNodeList,
        region_len(RegionName::ViaNodeList, n, EDGE_ID_SIZE)?,
    )?;
    let mut name_ids = store.publish(
        RegionName::NameIdList,
        region_len(RegionName::NameIdList, n, EDGE_ID_SIZE)?,
    )?;
    let mut turns = store.publish(
        RegionName::TurnInstructionList,
        region_len(RegionName::TurnInstructionList, n, TURN_INSTRUCTION_SIZE)?,
    )?;

    for (i, record) in reader.records::<OriginalEdgeRecord>(count).enumerate() {
        let record = record?;
        let at = i * EDGE_ID_SIZE;
        via_nodes[at..at + EDGE_ID_SIZE].copy_from_slice(&record.via_node.to_le_bytes());
        name_ids[at..at + EDGE_ID_SIZE].copy_from_slice(&record.name_id.to_le_bytes());
        turns[i] = record.turn_instruction;
    }

    debug!("Published {} original edges", count);
    Ok(count)
}
