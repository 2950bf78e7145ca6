//! Build timestamp. Never fails the load on its own account.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use crate::errors::Result;
use crate::region::{RegionName, DEFAULT_TIMESTAMP, MAX_TIMESTAMP_LEN};
use crate::store::RegionStore;

/// Publish the first line of the file at `path`, or `"n/a"` when there is none.
pub fn load_timestamp<S: RegionStore>(store: &mut S, path: Option<&Path>) -> Result<String> {
    let stamp = match path {
        Some(path) => {
            info!("Loading timestamp from {}", path.display());
            read_first_line(path)
        }
        None => {
            warn!("No timestamp file configured, using \"{}\"", DEFAULT_TIMESTAMP);
            None
        }
    };
    publish_timestamp(store, stamp.as_deref().unwrap_or(DEFAULT_TIMESTAMP))
}

/// Publish `stamp`, cut to at most [`MAX_TIMESTAMP_LEN`] bytes.
pub fn publish_timestamp<S: RegionStore>(store: &mut S, stamp: &str) -> Result<String> {
    let stamp = truncate_to_boundary(stamp, MAX_TIMESTAMP_LEN);
    store.publish_scalar(RegionName::TimestampSize, stamp.len() as u64)?;
    let mut region = store.publish(RegionName::Timestamp, stamp.len())?;
    region.copy_from_slice(stamp.as_bytes());
    debug!("Published timestamp {:?}", stamp);
    Ok(stamp.to_string())
}

fn read_first_line(path: &Path) -> Option<String> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!(
                "Cannot open timestamp file {}: {}; using \"{}\"",
                path.display(),
                e,
                DEFAULT_TIMESTAMP
            );
            return None;
        }
    };
    // bytes, not a String: a stray non-UTF-8 byte is replaced, not fatal
    let mut raw = Vec::new();
    if let Err(e) = BufReader::new(file).read_until(b'\n', &mut raw) {
        warn!(
            "Cannot read timestamp file {}: {}; using \"{}\"",
            path.display(),
            e,
            DEFAULT_TIMESTAMP
        );
        return None;
    }
    let line = String::from_utf8_lossy(&raw);
    let line = line.trim_end();
    if line.is_empty() {
        warn!(
            "Timestamp file {} is empty, using \"{}\"",
            path.display(),
            DEFAULT_TIMESTAMP
        );
        return None;
    }
    Some(line.to_string())
}

// Longest prefix of `s` within `max` bytes that ends on a char boundary.
fn truncate_to_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
