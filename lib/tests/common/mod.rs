#![allow(dead_code)]

use std::fs;
use std::path::Path;

use routestore::ArtifactPaths;
use routestore_artifacts::{
    write_hsgr, write_records, GraphEdge, GraphNode, GraphSnapshot, NamesArtifact, NodeRecord,
    OriginalEdgeRecord, RTreeNode,
};

pub const CHECKSUM: u32 = 0xDEAD_BEEF;
pub const STREET_NAMES: [&str; 3] = ["Karl-Marx-Allee", "Unter den Linden", "Ring"];

/// Four nodes and six edges, forming a small square with one diagonal.
pub fn square_graph() -> GraphSnapshot {
    let edge = |target, id, distance| GraphEdge {
        target,
        id,
        distance,
        forward: true,
        backward: true,
        ..Default::default()
    };
    GraphSnapshot {
        nodes: vec![
            GraphNode { first_edge: 0 },
            GraphNode { first_edge: 2 },
            GraphNode { first_edge: 4 },
            GraphNode { first_edge: 5 },
        ],
        edges: vec![
            edge(1, 0, 10),
            edge(3, 1, 10),
            edge(2, 2, 10),
            edge(3, 3, 14),
            edge(3, 4, 10),
            GraphEdge {
                shortcut: true,
                ..edge(0, 2, 20)
            },
        ],
        checksum: CHECKSUM,
    }
}

pub fn original_edges(n: u32) -> Vec<OriginalEdgeRecord> {
    (0..n)
        .map(|i| OriginalEdgeRecord {
            via_node: i % 4,
            name_id: i % STREET_NAMES.len() as u32,
            turn_instruction: (i % 7) as u8,
        })
        .collect()
}

pub fn nodes() -> Vec<NodeRecord> {
    (0..4)
        .map(|i| NodeRecord {
            lat: 52_500_000 + i * 1_000,
            lon: 13_400_000 - i * 1_000,
            id: 1_000 + i as u32,
        })
        .collect()
}

pub fn tree() -> Vec<RTreeNode> {
    let mut root = RTreeNode::default();
    root.0[..4].copy_from_slice(&52_500_000i32.to_le_bytes());
    root.0[16] = 4;
    vec![root]
}

/// Write a complete dataset into `dir`. `timestamp` of `None` leaves the
/// timestamp file out entirely.
pub fn write_dataset(dir: &Path, timestamp: Option<&str>) -> ArtifactPaths {
    let mut builder = ArtifactPaths::builder();
    builder
        .names(dir.join("map.osrm.names"))
        .graph(dir.join("map.osrm.hsgr"))
        .original_edges(dir.join("map.osrm.edges"))
        .nodes(dir.join("map.osrm.nodes"))
        .spatial_index(dir.join("map.osrm.ramIndex"))
        .timestamp(dir.join("map.osrm.timestamp"));
    let paths = builder.build().expect("paths");

    NamesArtifact::from_names(STREET_NAMES)
        .expect("names")
        .write(&paths.names)
        .expect("write names");
    write_hsgr(&paths.graph, &square_graph()).expect("write graph");
    write_records(&paths.original_edges, &original_edges(6)).expect("write edges");
    write_records(&paths.nodes, &nodes()).expect("write nodes");
    write_records(&paths.spatial_index, &tree()).expect("write tree");
    if let Some(ts) = timestamp {
        fs::write(paths.timestamp.as_ref().expect("timestamp path"), ts).expect("write timestamp");
    }
    paths
}
