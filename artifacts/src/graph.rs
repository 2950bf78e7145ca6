//! Parser for the contracted query graph file (`.hsgr`).
//!
//! Layout:
//!
//! ```text
//! u32 checksum
//! u32 node_count
//! node_count × GraphNode
//! u32 edge_count
//! edge_count × GraphEdge
//! ```

use std::io::Read;
use std::path::Path;

use crate::reader::{RecordReader, Result};
use crate::record::{GraphEdge, GraphNode};

/// In-memory result of parsing a graph file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Checksum written by the graph builder; consumers compare it against
    /// their other data files.
    pub checksum: u32,
}

impl GraphSnapshot {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Parse a graph file from disk.
pub fn read_hsgr(path: &Path) -> Result<GraphSnapshot> {
    let mut r = RecordReader::open(path)?;
    read_hsgr_from(&mut r)
}

/// Parse a graph from an already opened reader.
pub fn read_hsgr_from<R: Read>(r: &mut RecordReader<R>) -> Result<GraphSnapshot> {
    let checksum = r.read_u32("graph checksum")?;
    let node_count = r.read_u32("graph node count")?;
    let nodes = r.read_records::<GraphNode>(node_count)?;
    let edge_count = r.read_u32("graph edge count")?;
    let edges = r.read_records::<GraphEdge>(edge_count)?;
    Ok(GraphSnapshot {
        nodes,
        edges,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ArtifactError;
    use crate::record::Record;
    use crate::writer::encode_hsgr;
    use std::io::Cursor;

    #[test]
    fn parses_nodes_edges_and_checksum() {
        let g = GraphSnapshot {
            nodes: vec![GraphNode { first_edge: 0 }, GraphNode { first_edge: 1 }],
            edges: vec![GraphEdge {
                target: 1,
                id: 4,
                shortcut: false,
                distance: 30,
                forward: true,
                backward: true,
            }],
            checksum: 0xDEAD_BEEF,
        };
        let mut r = RecordReader::new(Cursor::new(encode_hsgr(&g).unwrap()), "mem.hsgr");
        let parsed = read_hsgr_from(&mut r).unwrap();
        assert_eq!(parsed, g);
        assert_eq!(
            r.offset() as usize,
            12 + 2 * GraphNode::SIZE + GraphEdge::SIZE
        );
    }

    #[test]
    fn missing_edges_is_truncation() {
        let g = GraphSnapshot {
            nodes: vec![GraphNode { first_edge: 0 }],
            edges: vec![GraphEdge::default(); 2],
            checksum: 1,
        };
        let mut bytes = encode_hsgr(&g).unwrap();
        bytes.truncate(bytes.len() - GraphEdge::SIZE);
        let mut r = RecordReader::new(Cursor::new(bytes), "mem.hsgr");
        match read_hsgr_from(&mut r).unwrap_err() {
            ArtifactError::Truncated {
                what,
                expected,
                found,
                ..
            } => {
                assert_eq!(what, "graph edges");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            e => panic!("expected Truncated, got {e:?}"),
        }
    }
}
