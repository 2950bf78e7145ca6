//! Sequential reader for count-prefixed binary artifacts.
//!
//! Every artifact starts with a little-endian `u32` header holding an element
//! count or a byte length, followed by that many fixed-size records or raw
//! bytes. [`RecordReader`] consumes such a file front to back without
//! seeking. The file handle is owned by the reader and released when it is
//! dropped, on success or on error.
//!
//! ```no_run
//! use routestore_artifacts::{NodeRecord, RecordReader};
//! use std::path::Path;
//!
//! let mut r = RecordReader::open(Path::new("map.nodes")).expect("open");
//! let n = r.read_u32("node count").expect("header");
//! for node in r.records::<NodeRecord>(n) {
//!     let node = node.expect("node");
//!     println!("{} {}", node.lat, node.lon);
//! }
//! ```

use std::{
    fmt,
    fs::File,
    io::{self, BufReader, ErrorKind, Read},
    marker::PhantomData,
    path::Path,
};

use crate::record::Record;

/// Errors that can arise when reading or writing an artifact.
#[derive(Debug)]
pub enum ArtifactError {
    /// Underlying I/O error.
    Io(io::Error),
    /// Input that cannot be encoded, such as a count that overflows a header.
    Invalid(&'static str),
    /// Fewer bytes or records available than a header declared.
    Truncated {
        /// The artifact being read (usually its path).
        source: String,
        /// What was being read, in the unit of `expected`/`found`.
        what: &'static str,
        expected: u64,
        found: u64,
    },
}

impl fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactError::Io(e) => write!(f, "{}", e),
            ArtifactError::Invalid(m) => write!(f, "{}", m),
            ArtifactError::Truncated {
                source,
                what,
                expected,
                found,
            } => write!(
                f,
                "{}: truncated {}: expected {}, found {}",
                source, what, expected, found
            ),
        }
    }
}
impl std::error::Error for ArtifactError {}
impl From<io::Error> for ArtifactError {
    fn from(e: io::Error) -> Self {
        ArtifactError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Forward-only reader over a binary artifact.
#[derive(Debug)]
pub struct RecordReader<R> {
    inner: R,
    source: String,
    offset: u64,
}

impl RecordReader<BufReader<File>> {
    /// Open `path` for sequential reading.
    pub fn open(path: &Path) -> Result<Self> {
        let f = File::open(path)?;
        Ok(Self::new(BufReader::new(f), path.display().to_string()))
    }
}

impl<R: Read> RecordReader<R> {
    /// Wrap an arbitrary byte stream. `source` names it in error messages.
    pub fn new(inner: R, source: impl Into<String>) -> Self {
        RecordReader {
            inner,
            source: source.into(),
            offset: 0,
        }
    }

    /// Name of the underlying artifact, as used in error messages.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    // Read until `buf` is full or the stream ends; returns bytes read.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ArtifactError::Io(e)),
            }
        }
        self.offset += filled as u64;
        Ok(filled)
    }

    fn truncated(&self, what: &'static str, expected: u64, found: u64) -> ArtifactError {
        ArtifactError::Truncated {
            source: self.source.clone(),
            what,
            expected,
            found,
        }
    }

    /// Read a little-endian `u32` header or length field.
    pub fn read_u32(&mut self, what: &'static str) -> Result<u32> {
        let mut b = [0u8; 4];
        self.read_into(&mut b, what)?;
        Ok(u32::from_le_bytes(b))
    }

    /// Fill `buf` completely; `what` describes the bytes for error messages.
    pub fn read_into(&mut self, buf: &mut [u8], what: &'static str) -> Result<()> {
        let got = self.fill(buf)?;
        if got < buf.len() {
            return Err(self.truncated(what, buf.len() as u64, got as u64));
        }
        Ok(())
    }

    /// Read and decode exactly one record.
    pub fn read_record<T: Record>(&mut self) -> Result<T> {
        let mut buf = vec![0u8; T::SIZE];
        self.read_into(&mut buf, T::NAME)?;
        Ok(T::decode(&buf))
    }

    /// Read `count` records into a vector.
    pub fn read_records<T: Record>(&mut self, count: u32) -> Result<Vec<T>> {
        // a corrupt header must not trigger a huge up-front allocation
        let mut out = Vec::with_capacity((count as usize).min(1 << 16));
        for r in self.records::<T>(count) {
            out.push(r?);
        }
        Ok(out)
    }

    /// Stream `count` records one at a time.
    ///
    /// On a short read the iterator yields a single
    /// [`ArtifactError::Truncated`] counted in whole records, then stops.
    pub fn records<T: Record>(&mut self, count: u32) -> Records<'_, R, T> {
        Records {
            reader: self,
            buf: vec![0u8; T::SIZE],
            next: 0,
            count,
            done: false,
            _marker: PhantomData,
        }
    }
}

/// Iterator returned by [`RecordReader::records`].
#[derive(Debug)]
pub struct Records<'a, R, T> {
    reader: &'a mut RecordReader<R>,
    buf: Vec<u8>,
    next: u32,
    count: u32,
    done: bool,
    _marker: PhantomData<T>,
}

impl<R: Read, T: Record> Iterator for Records<'_, R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next >= self.count {
            return None;
        }
        let got = match self.reader.fill(&mut self.buf) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if got < T::SIZE {
            self.done = true;
            return Some(Err(self.reader.truncated(
                T::NAME,
                self.count as u64,
                self.next as u64,
            )));
        }
        self.next += 1;
        Some(Ok(T::decode(&self.buf)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.next.min(self.count)) as usize;
        (0, Some(left))
    }
}
