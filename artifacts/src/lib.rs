//! routestore-artifacts: byte layouts of the preprocessed routing artifacts.
//!
//! The offline pipeline writes a handful of flat, count-prefixed binary files
//! (street names, the contracted graph, original edge data, node coordinates
//! and the spatial index). This crate defines their record layouts, a
//! forward-only reader for them and writers used to produce small fixtures.
//!
//! Read the node file record by record
//!
//! ```no_run
//! use routestore_artifacts::{Coordinate, NodeRecord, RecordReader};
//! use std::path::Path;
//!
//! let mut r = RecordReader::open(Path::new("map.osrm.nodes")).expect("open");
//! let n = r.read_u32("node count").expect("count");
//! let coords: Vec<Coordinate> = r
//!     .records::<NodeRecord>(n)
//!     .map(|node| node.map(Coordinate::from))
//!     .collect::<Result<_, _>>()
//!     .expect("nodes");
//! println!("{} coordinates", coords.len());
//! ```
//!
//! Write a names artifact
//!
//! ```no_run
//! use routestore_artifacts::NamesArtifact;
//!
//! let names = NamesArtifact::from_names(["Unter den Linden", "Friedrichstraße"]).unwrap();
//! names.write("map.osrm.names").unwrap();
//! ```

pub mod graph;
pub mod reader;
pub mod record;
pub mod writer;

pub use graph::{GraphSnapshot, read_hsgr};
pub use reader::{ArtifactError, RecordReader, Records};
pub use record::{
    COORDINATE_PRECISION, Coordinate, GraphEdge, GraphNode, NodeRecord, OriginalEdgeRecord,
    RTREE_BRANCHING_FACTOR, RTreeNode, Record,
};
pub use writer::{NamesArtifact, encode_hsgr, encode_records, write_hsgr, write_records};

/// Crate‑level result type using the artifact error.
pub type Result<T> = std::result::Result<T, crate::reader::ArtifactError>;
