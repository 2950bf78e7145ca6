//! Runs the artifact loaders against one store, in order.

use std::fmt;
use std::fs;
use std::io::ErrorKind;

use log::{debug, info};
use serde::Serialize;

use crate::config::ArtifactPaths;
use crate::errors::{DatastoreError, Result};
use crate::loaders::{self, GraphSource, HsgrGraphSource};
use crate::region::{RegionName, LAYOUT_VERSION};
use crate::store::RegionStore;

/// Counts reported by a successful load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub names: u32,
    pub names_bytes: u32,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub checksum: u32,
    pub original_edges: u32,
    pub coordinates: u32,
    pub tree_nodes: u32,
    pub timestamp: String,
    pub layout_version: u64,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "names:          {} ({} bytes)", self.names, self.names_bytes)?;
        writeln!(f, "graph nodes:    {}", self.graph_nodes)?;
        writeln!(f, "graph edges:    {}", self.graph_edges)?;
        writeln!(f, "checksum:       {:#010x}", self.checksum)?;
        writeln!(f, "original edges: {}", self.original_edges)?;
        writeln!(f, "coordinates:    {}", self.coordinates)?;
        writeln!(f, "tree nodes:     {}", self.tree_nodes)?;
        writeln!(f, "timestamp:      {}", self.timestamp)?;
        write!(f, "layout version: {}", self.layout_version)
    }
}

/// Check that every required artifact exists and is non-empty.
pub fn preflight(paths: &ArtifactPaths) -> Result<()> {
    for (what, path) in paths.required() {
        debug!("Checking {} artifact {}", what, path.display());
        let meta = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DatastoreError::MissingArtifact {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        if !meta.is_file() {
            return Err(DatastoreError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        if meta.len() == 0 {
            return Err(DatastoreError::EmptyArtifact {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Publishes a full dataset into a [`RegionStore`].
///
/// Loaders run in a fixed order (names, graph, original edges, nodes,
/// spatial index, timestamp), then `layout-version` is published. The first
/// error stops the run; regions already published stay in the store.
pub struct DataStoreLoader<'a, S: RegionStore> {
    store: &'a mut S,
    graph: Box<dyn GraphSource + 'a>,
}

impl<'a, S: RegionStore> DataStoreLoader<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        DataStoreLoader {
            store,
            graph: Box::new(HsgrGraphSource),
        }
    }

    /// Replace the `.hsgr` parser with another graph source.
    pub fn with_graph_source<G: GraphSource + 'a>(mut self, graph: G) -> Self {
        self.graph = Box::new(graph);
        self
    }

    pub fn load(&mut self, paths: &ArtifactPaths) -> Result<LoadSummary> {
        preflight(paths)?;

        let names = loaders::load_names(self.store, &paths.names)?;
        let graph = loaders::load_graph(self.store, self.graph.as_ref(), &paths.graph)?;
        let original_edges = loaders::load_original_edges(self.store, &paths.original_edges)?;
        let coordinates = loaders::load_nodes(self.store, &paths.nodes)?;
        let tree_nodes = loaders::load_rtree(self.store, &paths.spatial_index)?;
        let timestamp = loaders::load_timestamp(self.store, paths.timestamp.as_deref())?;
        self.store
            .publish_scalar(RegionName::LayoutVersion, LAYOUT_VERSION)?;

        info!("All regions published (checksum {:#010x})", graph.checksum);
        Ok(LoadSummary {
            names: names.entries,
            names_bytes: names.blob_len,
            graph_nodes: graph.nodes,
            graph_edges: graph.edges,
            checksum: graph.checksum,
            original_edges,
            coordinates,
            tree_nodes,
            timestamp,
            layout_version: LAYOUT_VERSION,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn paths_in(dir: &Path) -> ArtifactPaths {
        ArtifactPaths::builder()
            .names(dir.join("m.names"))
            .graph(dir.join("m.hsgr"))
            .original_edges(dir.join("m.edges"))
            .nodes(dir.join("m.nodes"))
            .spatial_index(dir.join("m.ramIndex"))
            .build()
            .unwrap()
    }

    #[test]
    fn preflight_reports_first_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        fs::write(&paths.names, [1u8]).unwrap();
        match preflight(&paths).unwrap_err() {
            DatastoreError::MissingArtifact { path } => assert_eq!(path, paths.graph),
            e => panic!("expected MissingArtifact, got {e:?}"),
        }
    }

    #[test]
    fn preflight_rejects_empty_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        for (_, p) in paths.required() {
            fs::write(p, [1u8]).unwrap();
        }
        assert!(preflight(&paths).is_ok());

        fs::write(&paths.spatial_index, b"").unwrap();
        assert!(matches!(
            preflight(&paths).unwrap_err(),
            DatastoreError::EmptyArtifact { .. }
        ));

        fs::remove_file(&paths.spatial_index).unwrap();
        fs::create_dir(&paths.spatial_index).unwrap();
        let err = preflight(&paths).unwrap_err();
        match &err {
            DatastoreError::NotAFile { path } => assert_eq!(path, &paths.spatial_index),
            e => panic!("expected NotAFile, got {e:?}"),
        }
        assert!(err.to_string().ends_with("is not a regular file"));
    }

    #[test]
    fn summary_renders_checksum_in_hex() {
        let summary = LoadSummary {
            names: 1,
            names_bytes: 4,
            graph_nodes: 4,
            graph_edges: 6,
            checksum: 0xDEAD_BEEF,
            original_edges: 6,
            coordinates: 4,
            tree_nodes: 1,
            timestamp: "n/a".into(),
            layout_version: 1,
        };
        let text = summary.to_string();
        assert!(text.contains("checksum:       0xdeadbeef"));
        assert!(text.ends_with("layout version: 1"));
    }
}
