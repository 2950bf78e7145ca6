//! Artifact paths and the JSON config file they are usually read from.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::errors::{DatastoreError, Result};

/// Resolved locations of the six artifacts of one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct ArtifactPaths {
    pub names: PathBuf,
    pub graph: PathBuf,
    pub original_edges: PathBuf,
    pub nodes: PathBuf,
    pub spatial_index: PathBuf,
    /// Optional; a missing timestamp degrades to `"n/a"`.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub timestamp: Option<PathBuf>,
}

impl ArtifactPaths {
    pub fn builder() -> ArtifactPathsBuilder {
        ArtifactPathsBuilder::default()
    }

    /// The artifacts that must exist and be non-empty, labelled.
    pub fn required(&self) -> [(&'static str, &Path); 5] {
        [
            ("names", self.names.as_path()),
            ("graph", self.graph.as_path()),
            ("original edges", self.original_edges.as_path()),
            ("nodes", self.nodes.as_path()),
            ("spatial index", self.spatial_index.as_path()),
        ]
    }
}

impl From<ArtifactPathsBuilderError> for DatastoreError {
    fn from(err: ArtifactPathsBuilderError) -> Self {
        match err {
            ArtifactPathsBuilderError::UninitializedField(field) => {
                DatastoreError::MissingConfig(field)
            }
            ArtifactPathsBuilderError::ValidationError(_) => {
                DatastoreError::MissingConfig("artifact paths")
            }
        }
    }
}

/// On-disk config naming the artifact files, using the routing server's keys.
///
/// ```json
/// {
///   "hsgrData": "berlin.osrm.hsgr",
///   "ramIndex": "berlin.osrm.ramIndex",
///   "nodesData": "berlin.osrm.nodes",
///   "edgesData": "berlin.osrm.edges",
///   "namesData": "berlin.osrm.names",
///   "timestamp": "berlin.osrm.timestamp"
/// }
/// ```
///
/// Unknown keys are ignored so the server's own config file can be reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatastoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsgr_data: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_index: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes_data: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges_data: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names_data: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<PathBuf>,
}

impl DatastoreConfig {
    pub fn from_file(file: &Path) -> Result<Self> {
        let file = File::open(file)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Turn the config into artifact paths, joining relative entries onto `base`.
    pub fn resolve(&self, base: &Path) -> Result<ArtifactPaths> {
        fn required<'a>(value: &'a Option<PathBuf>, key: &'static str) -> Result<&'a PathBuf> {
            value.as_ref().ok_or(DatastoreError::MissingConfig(key))
        }
        let graph = required(&self.hsgr_data, "hsgrData")?;
        let spatial_index = required(&self.ram_index, "ramIndex")?;
        let nodes = required(&self.nodes_data, "nodesData")?;
        let original_edges = required(&self.edges_data, "edgesData")?;
        let names = required(&self.names_data, "namesData")?;

        let mut builder = ArtifactPaths::builder();
        builder
            .names(base.join(names))
            .graph(base.join(graph))
            .original_edges(base.join(original_edges))
            .nodes(base.join(nodes))
            .spatial_index(base.join(spatial_index));
        if let Some(ts) = &self.timestamp {
            builder.timestamp(base.join(ts));
        }
        Ok(builder.build()?)
    }
}

/// Read the config at `file` and resolve it against the file's directory.
pub fn load_paths(file: &Path) -> Result<ArtifactPaths> {
    let config = DatastoreConfig::from_file(file)?;
    let base = file.parent().unwrap_or_else(|| Path::new(""));
    config.resolve(base)
}
