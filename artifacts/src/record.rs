//! Fixed-size record layouts shared by the artifact files and the published
//! regions.
//!
//! Every record is encoded little-endian with an explicit byte layout, so the
//! producer and the query engine agree on sizes without relying on compiler
//! struct layout.

/// A fixed-size record that can be decoded from and encoded into a byte slice
/// of exactly [`Record::SIZE`] bytes.
pub trait Record: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;
    /// Human readable plural used in truncation messages.
    const NAME: &'static str;

    /// Decode a record from `buf`. `buf.len()` must equal [`Record::SIZE`].
    fn decode(buf: &[u8]) -> Self;

    /// Encode the record into `out`. `out.len()` must equal [`Record::SIZE`].
    fn encode(&self, out: &mut [u8]);
}

#[inline]
pub(crate) fn le_u32(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

#[inline]
pub(crate) fn le_i32(buf: &[u8], off: usize) -> i32 {
    i32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

#[inline]
fn put_u32(out: &mut [u8], off: usize, v: u32) {
    out[off..off + 4].copy_from_slice(&v.to_le_bytes());
}

#[inline]
fn put_i32(out: &mut [u8], off: usize, v: i32) {
    out[off..off + 4].copy_from_slice(&v.to_le_bytes());
}

/// Per-edge data for an original (pre-contraction) edge.
///
/// On disk: `via_node u32 | name_id u32 | turn_instruction u8 | 3 pad bytes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OriginalEdgeRecord {
    pub via_node: u32,
    pub name_id: u32,
    pub turn_instruction: u8,
}

impl Record for OriginalEdgeRecord {
    const SIZE: usize = 12;
    const NAME: &'static str = "original edges";

    fn decode(buf: &[u8]) -> Self {
        OriginalEdgeRecord {
            via_node: le_u32(buf, 0),
            name_id: le_u32(buf, 4),
            turn_instruction: buf[8],
        }
    }

    fn encode(&self, out: &mut [u8]) {
        put_u32(out, 0, self.via_node);
        put_u32(out, 4, self.name_id);
        out[8] = self.turn_instruction;
        out[9..12].fill(0);
    }
}

/// Node as written by the preprocessing step.
///
/// On disk: `lat i32 | lon i32 | id u32`. Coordinates are fixed-point
/// degrees scaled by [`COORDINATE_PRECISION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeRecord {
    pub lat: i32,
    pub lon: i32,
    pub id: u32,
}

impl Record for NodeRecord {
    const SIZE: usize = 12;
    const NAME: &'static str = "nodes";

    fn decode(buf: &[u8]) -> Self {
        NodeRecord {
            lat: le_i32(buf, 0),
            lon: le_i32(buf, 4),
            id: le_u32(buf, 8),
        }
    }

    fn encode(&self, out: &mut [u8]) {
        put_i32(out, 0, self.lat);
        put_i32(out, 4, self.lon);
        put_u32(out, 8, self.id);
    }
}

/// Scale factor between degrees and fixed-point coordinates.
pub const COORDINATE_PRECISION: f64 = 1_000_000.0;

/// Fixed-point coordinate as published in `coordinate-list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coordinate {
    pub lat: i32,
    pub lon: i32,
}

impl Coordinate {
    pub fn new(lat: i32, lon: i32) -> Self {
        Coordinate { lat, lon }
    }

    /// Latitude and longitude in degrees.
    pub fn degrees(&self) -> (f64, f64) {
        (
            self.lat as f64 / COORDINATE_PRECISION,
            self.lon as f64 / COORDINATE_PRECISION,
        )
    }
}

impl From<NodeRecord> for Coordinate {
    fn from(n: NodeRecord) -> Self {
        Coordinate::new(n.lat, n.lon)
    }
}

impl Record for Coordinate {
    const SIZE: usize = 8;
    const NAME: &'static str = "coordinates";

    fn decode(buf: &[u8]) -> Self {
        Coordinate::new(le_i32(buf, 0), le_i32(buf, 4))
    }

    fn encode(&self, out: &mut [u8]) {
        put_i32(out, 0, self.lat);
        put_i32(out, 4, self.lon);
    }
}

/// Node of the contracted query graph: index of its first outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphNode {
    pub first_edge: u32,
}

impl Record for GraphNode {
    const SIZE: usize = 4;
    const NAME: &'static str = "graph nodes";

    fn decode(buf: &[u8]) -> Self {
        GraphNode {
            first_edge: le_u32(buf, 0),
        }
    }

    fn encode(&self, out: &mut [u8]) {
        put_u32(out, 0, self.first_edge);
    }
}

const ID_MASK: u32 = 0x7FFF_FFFF;
const SHORTCUT_BIT: u32 = 1 << 31;
const DISTANCE_MASK: u32 = 0x3FFF_FFFF;
const FORWARD_BIT: u32 = 1 << 30;
const BACKWARD_BIT: u32 = 1 << 31;

/// Edge of the contracted query graph.
///
/// Layout (12 bytes):
///
/// ```text
/// word 0: target
/// word 1: id (bits 0..31) | shortcut (bit 31)
/// word 2: distance (bits 0..30, two's complement) | forward (bit 30) | backward (bit 31)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphEdge {
    pub target: u32,
    /// Original edge id, or the middle node for shortcuts. 31 bits.
    pub id: u32,
    pub shortcut: bool,
    /// Edge weight. 30 bits, signed.
    pub distance: i32,
    pub forward: bool,
    pub backward: bool,
}

impl Record for GraphEdge {
    const SIZE: usize = 12;
    const NAME: &'static str = "graph edges";

    fn decode(buf: &[u8]) -> Self {
        let w1 = le_u32(buf, 4);
        let w2 = le_u32(buf, 8);
        // sign-extend the 30 bit distance
        let distance = (((w2 & DISTANCE_MASK) << 2) as i32) >> 2;
        GraphEdge {
            target: le_u32(buf, 0),
            id: w1 & ID_MASK,
            shortcut: w1 & SHORTCUT_BIT != 0,
            distance,
            forward: w2 & FORWARD_BIT != 0,
            backward: w2 & BACKWARD_BIT != 0,
        }
    }

    fn encode(&self, out: &mut [u8]) {
        let mut w1 = self.id & ID_MASK;
        if self.shortcut {
            w1 |= SHORTCUT_BIT;
        }
        let mut w2 = (self.distance as u32) & DISTANCE_MASK;
        if self.forward {
            w2 |= FORWARD_BIT;
        }
        if self.backward {
            w2 |= BACKWARD_BIT;
        }
        put_u32(out, 0, self.target);
        put_u32(out, 4, w1);
        put_u32(out, 8, w2);
    }
}

/// Number of child slots in a spatial index tree node.
pub const RTREE_BRANCHING_FACTOR: usize = 50;

/// Opaque spatial index tree node.
///
/// The builder lays it out as a bounding rectangle (four `i32`), a packed
/// child-count word and [`RTREE_BRANCHING_FACTOR`] child ids. The loader
/// never looks inside; it only needs the size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RTreeNode(pub [u8; RTreeNode::BYTES]);

impl RTreeNode {
    pub const BYTES: usize = 16 + 4 + 4 * RTREE_BRANCHING_FACTOR;
}

impl Default for RTreeNode {
    fn default() -> Self {
        RTreeNode([0u8; RTreeNode::BYTES])
    }
}

impl Record for RTreeNode {
    const SIZE: usize = RTreeNode::BYTES;
    const NAME: &'static str = "tree nodes";

    fn decode(buf: &[u8]) -> Self {
        let mut raw = [0u8; RTreeNode::BYTES];
        raw.copy_from_slice(buf);
        RTreeNode(raw)
    }

    fn encode(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.0);
    }
}

/// Encode `records` back to back into a freshly allocated buffer.
pub fn encode_all<T: Record>(records: &[T]) -> Vec<u8> {
    let mut out = vec![0u8; records.len() * T::SIZE];
    for (chunk, r) in out.chunks_exact_mut(T::SIZE).zip(records) {
        r.encode(chunk);
    }
    out
}

/// Decode a buffer of back to back records. Trailing partial bytes are ignored.
pub fn decode_all<T: Record>(buf: &[u8]) -> Vec<T> {
    buf.chunks_exact(T::SIZE).map(T::decode).collect()
}
