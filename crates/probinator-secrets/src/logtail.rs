//! Bounded tail reads over an append-only log file

use probinator_core::Result;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Upper bound on bytes read from the end of the file, regardless of the
/// requested line count
const TAIL_BYTES: u64 = 64 * 1024;

/// Read up to `max_lines` complete lines from the end of `path`.
///
/// Only the last [`TAIL_BYTES`] of the file are ever read, so the cost stays
/// flat as the log grows. When the read starts mid-file the first, possibly
/// truncated line is dropped.
pub fn read_tail(path: &Path, max_lines: usize) -> Result<Vec<String>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let start = len.saturating_sub(TAIL_BYTES);
    if start > 0 {
        file.seek(SeekFrom::Start(start))?;
    }

    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;
    let text = String::from_utf8_lossy(&raw);

    let mut lines: Vec<&str> = text.lines().collect();
    if start > 0 && !lines.is_empty() {
        lines.remove(0);
    }

    let skip = lines.len().saturating_sub(max_lines);
    Ok(lines[skip..].iter().map(|s| s.to_string()).collect())
}
