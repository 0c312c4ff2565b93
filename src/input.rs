//! Record loading from JSON documents and JSON Lines files.

use std::fs::File;
use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result};
use memchr::memchr_iter;
use memmap2::Mmap;
use serde_json::Value;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::record::CanonicalRecord;

pub fn is_line_delimited(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("jsonl") | Some("ndjson")
    )
}

/// Loads raw records from `path`.
///
/// `.jsonl`/`.ndjson` files hold one record per line. Anything else is read
/// as one JSON document: a top-level array yields its elements, any other
/// value is a single record.
pub fn load_records(path: &Path, batch_size: usize) -> Result<Vec<Value>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    if file.metadata()?.len() == 0 {
        debug!(path = %path.display(), "empty input");
        return Ok(Vec::new());
    }
    let mmap = unsafe { Mmap::map(&file)? };

    let parsed = if is_line_delimited(path) {
        parse_lines(&mmap, batch_size)
    } else {
        parse_document(&mmap)
    };
    let records = parsed.with_context(|| format!("reading {}", path.display()))?;

    debug!(path = %path.display(), records = records.len(), "loaded");
    Ok(records)
}

pub fn parse_document(bytes: &[u8]) -> Result<Vec<Value>> {
    match serde_json::from_slice(bytes)? {
        Value::Array(items) => Ok(items),
        other => Ok(vec![other]),
    }
}

/// Parses JSON Lines, `batch_size` lines per unit of work. Blank lines are
/// skipped; a bad line is reported by its 1-based number.
pub fn parse_lines(bytes: &[u8], batch_size: usize) -> Result<Vec<Value>> {
    let lines = line_ranges(bytes);
    let batch_size = batch_size.max(1);
    let batches: Vec<(usize, &[Range<usize>])> = lines
        .chunks(batch_size)
        .enumerate()
        .map(|(i, chunk)| (i * batch_size, chunk))
        .collect();

    #[cfg(feature = "parallel")]
    let parsed = batches
        .par_iter()
        .map(|(first, chunk)| parse_batch(bytes, *first, chunk))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let parsed = batches
        .iter()
        .map(|(first, chunk)| parse_batch(bytes, *first, chunk))
        .collect::<Result<Vec<_>>>()?;

    Ok(parsed.into_iter().flatten().collect())
}

fn line_ranges(bytes: &[u8]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0usize;
    for nl in memchr_iter(b'\n', bytes) {
        ranges.push(start..nl);
        start = nl + 1;
    }
    if start < bytes.len() {
        ranges.push(start..bytes.len());
    }
    ranges
}

fn parse_batch(bytes: &[u8], first_line: usize, chunk: &[Range<usize>]) -> Result<Vec<Value>> {
    let mut out = Vec::with_capacity(chunk.len());
    for (offset, range) in chunk.iter().enumerate() {
        let line = bytes[range.clone()].trim_ascii();
        if line.is_empty() {
            continue;
        }
        let value = serde_json::from_slice(line)
            .with_context(|| format!("line {}", first_line + offset + 1))?;
        out.push(value);
    }
    Ok(out)
}

/// Loads the expected canonical records used by golden mode.
pub fn load_expected(path: &Path) -> Result<Vec<CanonicalRecord>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse_document(&bytes)?
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value(value)
                .with_context(|| format!("{}: expected record #{i}", path.display()))
        })
        .collect()
}
