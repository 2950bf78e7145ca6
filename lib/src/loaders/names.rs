//! Street names: `[u32 n][n × u32 offsets][u32 blob_len][blob]`.

use std::io::Read;
use std::path::Path;

use log::{debug, info};
use routestore_artifacts::RecordReader;

use super::region_len;
use crate::errors::{DatastoreError, Result};
use crate::region::{RegionName, NAME_OFFSET_SIZE};
use crate::store::RegionStore;

/// What the names loader published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamesCounts {
    /// Entries of the offset table.
    pub entries: u32,
    /// Bytes of name text, excluding the reserved trailing byte.
    pub blob_len: u32,
}

pub fn load_names<S: RegionStore>(store: &mut S, path: &Path) -> Result<NamesCounts> {
    info!("Loading names from {}", path.display());
    let mut reader = RecordReader::open(path)?;
    publish_names(store, &mut reader)
}

pub fn publish_names<S, R>(store: &mut S, reader: &mut RecordReader<R>) -> Result<NamesCounts>
where
    S: RegionStore,
    R: Read,
{
    let entries = reader.read_u32("names index count")?;
    if entries == 0 {
        return Err(DatastoreError::CorruptArtifact {
            artifact: reader.source().to_string(),
            reason: "names index has zero entries".to_string(),
        });
    }
    store.publish_scalar(RegionName::NamesIndexSize, entries as u64)?;
    {
        let len = region_len(RegionName::NamesIndex, entries as usize, NAME_OFFSET_SIZE)?;
        let mut index = store.publish(RegionName::NamesIndex, len)?;
        reader.read_into(&mut index, "names index bytes")?;
    }

    let blob_len = reader.read_u32("names blob length")?;
    store.publish_scalar(RegionName::NamesListSize, blob_len as u64)?;
    let blob = blob_len as usize;
    // one byte past the text stays zero
    let mut list = store.publish(RegionName::NamesList, blob + 1)?;
    reader.read_into(&mut list[..blob], "names blob bytes")?;

    debug!("Published {} names ({} bytes of text)", entries, blob_len);
    Ok(NamesCounts { entries, blob_len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::test_support::reader;
    use crate::store::MemoryStore;
    use routestore_artifacts::NamesArtifact;

    #[test]
    fn publishes_offsets_and_blob_with_reserved_byte() {
        let names = NamesArtifact::from_names(["Ring", "Allee"]).unwrap();
        let mut store = MemoryStore::new();
        let counts = publish_names(&mut store, &mut reader(names.to_bytes().unwrap())).unwrap();
        assert_eq!(counts, NamesCounts { entries: 3, blob_len: 9 });

        assert_eq!(store.scalar(RegionName::NamesIndexSize), Some(3));
        assert_eq!(store.scalar(RegionName::NamesListSize), Some(9));
        let index = store.region(RegionName::NamesIndex).unwrap();
        let expected: Vec<u8> = names.offsets.iter().flat_map(|o| o.to_le_bytes()).collect();
        assert_eq!(index, expected);
        assert_eq!(store.region(RegionName::NamesList).unwrap(), b"RingAllee\0");
    }

    #[test]
    fn zero_entries_is_corrupt_and_publishes_nothing() {
        let mut store = MemoryStore::new();
        let bytes = [0u32.to_le_bytes(), 0u32.to_le_bytes()].concat();
        let err = publish_names(&mut store, &mut reader(bytes)).unwrap_err();
        assert!(matches!(err, DatastoreError::CorruptArtifact { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn short_blob_is_truncation() {
        let mut bytes = NamesArtifact::from_names(["Ring"]).unwrap().to_bytes().unwrap();
        bytes.truncate(bytes.len() - 2);
        let mut store = MemoryStore::new();
        match publish_names(&mut store, &mut reader(bytes)).unwrap_err() {
            DatastoreError::TruncatedFile {
                expected, found, ..
            } => {
                assert_eq!(expected, 4);
                assert_eq!(found, 2);
            }
            e => panic!("expected TruncatedFile, got {e:?}"),
        }
    }
}
