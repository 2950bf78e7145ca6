//! The fixed set of region names that make up a published store.
//!
//! These names are the wire contract with the query server: it attaches to
//! each region by name and trusts the companion `*-size` region for the
//! element count.

use std::fmt;
use std::str::FromStr;

/// Bytes of a scalar region (`u64`, little-endian).
pub const SCALAR_SIZE: usize = std::mem::size_of::<u64>();

/// Bytes per entry of the `names-index` offset table.
pub const NAME_OFFSET_SIZE: usize = std::mem::size_of::<u32>();

/// Bytes per entry of `name-id-list` and `via-node-list`.
pub const EDGE_ID_SIZE: usize = std::mem::size_of::<u32>();

/// Bytes per entry of `turn-instruction-list`.
pub const TURN_INSTRUCTION_SIZE: usize = std::mem::size_of::<u8>();

/// Longest timestamp, in bytes, that is published.
pub const MAX_TIMESTAMP_LEN: usize = 25;

/// Published when no usable timestamp is available.
pub const DEFAULT_TIMESTAMP: &str = "n/a";

/// Version of the record layouts in `routestore_artifacts::record`.
/// Bump whenever a published record changes size or field order.
pub const LAYOUT_VERSION: u64 = 1;

/// Name of a published region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionName {
    NamesIndexSize,
    NamesIndex,
    NamesListSize,
    NamesList,
    GraphNodeListSize,
    GraphNodeList,
    GraphEdgeListSize,
    GraphEdgeList,
    Checksum,
    TimestampSize,
    Timestamp,
    NameIdListSize,
    NameIdList,
    TurnInstructionListSize,
    TurnInstructionList,
    ViaNodeListSize,
    ViaNodeList,
    CoordinateListSize,
    CoordinateList,
    RSearchTreeSize,
    RSearchTree,
    LayoutVersion,
}

impl RegionName {
    /// Every region name, in declaration order.
    pub const ALL: [RegionName; 22] = [
        RegionName::NamesIndexSize,
        RegionName::NamesIndex,
        RegionName::NamesListSize,
        RegionName::NamesList,
        RegionName::GraphNodeListSize,
        RegionName::GraphNodeList,
        RegionName::GraphEdgeListSize,
        RegionName::GraphEdgeList,
        RegionName::Checksum,
        RegionName::TimestampSize,
        RegionName::Timestamp,
        RegionName::NameIdListSize,
        RegionName::NameIdList,
        RegionName::TurnInstructionListSize,
        RegionName::TurnInstructionList,
        RegionName::ViaNodeListSize,
        RegionName::ViaNodeList,
        RegionName::CoordinateListSize,
        RegionName::CoordinateList,
        RegionName::RSearchTreeSize,
        RegionName::RSearchTree,
        RegionName::LayoutVersion,
    ];

    pub fn as_str(self) -> &'static str {
        use RegionName::*;
        match self {
            NamesIndexSize => "names-index-size",
            NamesIndex => "names-index",
            NamesListSize => "names-list-size",
            NamesList => "names-list",
            GraphNodeListSize => "graph-node-list-size",
            GraphNodeList => "graph-node-list",
            GraphEdgeListSize => "graph-edge-list-size",
            GraphEdgeList => "graph-edge-list",
            Checksum => "checksum",
            TimestampSize => "timestamp-size",
            Timestamp => "timestamp",
            NameIdListSize => "name-id-list-size",
            NameIdList => "name-id-list",
            TurnInstructionListSize => "turn-instruction-list-size",
            TurnInstructionList => "turn-instruction-list",
            ViaNodeListSize => "via-node-list-size",
            ViaNodeList => "via-node-list",
            CoordinateListSize => "coordinate-list-size",
            CoordinateList => "coordinate-list",
            RSearchTreeSize => "r-search-tree-size",
            RSearchTree => "r-search-tree",
            LayoutVersion => "layout-version",
        }
    }

    /// The `*-size` region that carries the element count (or byte length)
    /// of this data region. `None` for scalar regions.
    pub fn size_region(self) -> Option<RegionName> {
        use RegionName::*;
        Some(match self {
            NamesIndex => NamesIndexSize,
            NamesList => NamesListSize,
            GraphNodeList => GraphNodeListSize,
            GraphEdgeList => GraphEdgeListSize,
            Timestamp => TimestampSize,
            NameIdList => NameIdListSize,
            TurnInstructionList => TurnInstructionListSize,
            ViaNodeList => ViaNodeListSize,
            CoordinateList => CoordinateListSize,
            RSearchTree => RSearchTreeSize,
            _ => return None,
        })
    }

    /// True for regions holding a single `u64`.
    pub fn is_scalar(self) -> bool {
        self.size_region().is_none()
    }
}

impl fmt::Display for RegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegionName::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown region name: {s}"))
    }
}
