//! Writers producing artifact files in the layouts the loader consumes.
//!
//! The preprocessing pipeline is the real producer of these files; the
//! writers here exist so small, deterministic artifacts can be produced for
//! fixtures, tests and benchmarks.

use std::fs;
use std::path::Path;

use crate::graph::GraphSnapshot;
use crate::reader::{ArtifactError, Result};
use crate::record::{Record, encode_all};

fn count_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| ArtifactError::Invalid("element count does not fit a u32 header"))
}

/// Street-name artifact: an offset table followed by a UTF-8 blob.
///
/// `offsets` is opaque to the loader. [`NamesArtifact::from_names`] fills
/// it with the start offset of each name plus a final end offset, which is
/// what the query engine expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamesArtifact {
    pub offsets: Vec<u32>,
    pub blob: Vec<u8>,
}

impl NamesArtifact {
    /// Build the offset table and blob for `names`.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut offsets = Vec::new();
        let mut blob = Vec::new();
        for name in names {
            offsets.push(count_u32(blob.len())?);
            blob.extend_from_slice(name.as_ref().as_bytes());
        }
        offsets.push(count_u32(blob.len())?);
        Ok(NamesArtifact { offsets, blob })
    }

    /// Name `i`, if the offset table describes it.
    pub fn name(&self, i: usize) -> Option<&str> {
        let s = *self.offsets.get(i)? as usize;
        let e = *self.offsets.get(i + 1)? as usize;
        std::str::from_utf8(self.blob.get(s..e)?).ok()
    }

    /// Encode as `[u32 n][n × u32 offsets][u32 blob_len][blob]`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(8 + self.offsets.len() * 4 + self.blob.len());
        out.extend_from_slice(&count_u32(self.offsets.len())?.to_le_bytes());
        for o in &self.offsets {
            out.extend_from_slice(&o.to_le_bytes());
        }
        out.extend_from_slice(&count_u32(self.blob.len())?.to_le_bytes());
        out.extend_from_slice(&self.blob);
        Ok(out)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

/// Encode `[u32 count][count × T]`, the layout shared by the original-edge,
/// node and spatial index artifacts.
pub fn encode_records<T: Record>(records: &[T]) -> Result<Vec<u8>> {
    let mut out = count_u32(records.len())?.to_le_bytes().to_vec();
    out.extend_from_slice(&encode_all(records));
    Ok(out)
}

/// Write a count-prefixed record file.
pub fn write_records<P: AsRef<Path>, T: Record>(path: P, records: &[T]) -> Result<()> {
    fs::write(path, encode_records(records)?)?;
    Ok(())
}

/// Encode a graph in the `.hsgr` layout read by [`crate::graph::read_hsgr`].
pub fn encode_hsgr(graph: &GraphSnapshot) -> Result<Vec<u8>> {
    let mut out = graph.checksum.to_le_bytes().to_vec();
    out.extend_from_slice(&encode_records(&graph.nodes)?);
    out.extend_from_slice(&encode_records(&graph.edges)?);
    Ok(out)
}

pub fn write_hsgr<P: AsRef<Path>>(path: P, graph: &GraphSnapshot) -> Result<()> {
    fs::write(path, encode_hsgr(graph)?)?;
    Ok(())
}
