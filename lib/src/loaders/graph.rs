//! The contracted graph, parsed by a [`GraphSource`].

use std::path::Path;

use log::{debug, info};
use routestore_artifacts::{read_hsgr, GraphSnapshot};

use super::publish_list;
use crate::errors::Result;
use crate::region::RegionName;
use crate::store::RegionStore;

/// Parses a graph file into nodes, edges and a checksum.
pub trait GraphSource {
    fn read_graph(&self, path: &Path) -> Result<GraphSnapshot>;
}

/// Reads the `.hsgr` layout: `[u32 checksum][u32 n][nodes][u32 m][edges]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HsgrGraphSource;

impl GraphSource for HsgrGraphSource {
    fn read_graph(&self, path: &Path) -> Result<GraphSnapshot> {
        Ok(read_hsgr(path)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphCounts {
    pub nodes: usize,
    pub edges: usize,
    pub checksum: u32,
}

/// Publish the node list, the edge list and the checksum of the graph at `path`.
pub fn load_graph<S: RegionStore>(
    store: &mut S,
    source: &dyn GraphSource,
    path: &Path,
) -> Result<GraphCounts> {
    info!("Loading graph from {}", path.display());
    let graph = source.read_graph(path)?;
    publish_list(store, RegionName::GraphNodeList, &graph.nodes)?;
    publish_list(store, RegionName::GraphEdgeList, &graph.edges)?;
    store.publish_scalar(RegionName::Checksum, graph.checksum as u64)?;
    debug!(
        "Published {} graph nodes, {} graph edges, checksum {:#010x}",
        graph.node_count(),
        graph.edge_count(),
        graph.checksum
    );
    Ok(GraphCounts {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        checksum: graph.checksum,
    })
}
