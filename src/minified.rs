//! Heuristic detection of minified or bundled content.
//!
//! Callers consult this before semantic chunking: a minified bundle parses into
//! a huge tree with nothing worth indexing at declaration granularity.
//!
//! Signals, in order (any hit short-circuits):
//! 1. the path contains a dot-delimited `.min.` token
//! 2. the file name ends with a minified/bundle marker such as `.bundle.js`
//! 3. content statistics: average line length, longest line, and (for content
//!    above a minimum size) the share of whitespace bytes
//!
//! Empty content or an empty path is never minified.

use serde::{Deserialize, Serialize};

/// Extensions that take a `.min.` / `.bundle.` marker in front of them.
const MARKED_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "css"];
const MARKERS: &[&str] = &["min", "bundle"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifiedThresholds {
    /// Average bytes per line above which content counts as minified.
    pub max_avg_line_len: usize,
    /// Any single line longer than this (bytes) counts as minified.
    pub max_line_len: usize,
    /// Content smaller than this skips the whitespace ratio check.
    pub min_size_for_whitespace: usize,
    /// Whitespace share below which content counts as minified.
    pub min_whitespace_ratio: f64,
}

impl Default for MinifiedThresholds {
    fn default() -> Self {
        Self {
            max_avg_line_len: 500,
            max_line_len: 10 * 1024,
            min_size_for_whitespace: 1024,
            min_whitespace_ratio: 0.05,
        }
    }
}

/// Classify with the default thresholds.
pub fn is_minified(content: &[u8], path: &str) -> bool {
    is_minified_with(content, path, &MinifiedThresholds::default())
}

/// Classify with explicit thresholds.
///
/// Works on raw bytes, so arbitrary binary input is fine.
pub fn is_minified_with(content: &[u8], path: &str, thresholds: &MinifiedThresholds) -> bool {
    if content.is_empty() || path.is_empty() {
        return false;
    }

    has_min_token(path) || has_bundle_marker(path) || looks_minified(content, thresholds)
}

/// `.min.` anywhere in the path, bounded by dots on both sides.
fn has_min_token(path: &str) -> bool {
    path.to_ascii_lowercase().contains(".min.")
}

/// File name ends in `.<marker>.<ext>` for a known web asset extension.
fn has_bundle_marker(path: &str) -> bool {
    let file_name = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
        .to_ascii_lowercase();

    let mut parts = file_name.rsplit('.');
    let (Some(ext), Some(marker), Some(stem)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !stem.is_empty() && MARKED_EXTENSIONS.contains(&ext) && MARKERS.contains(&marker)
}

fn looks_minified(content: &[u8], thresholds: &MinifiedThresholds) -> bool {
    let mut lines = 0usize;
    let mut longest = 0usize;
    for line in content.split(|&b| b == b'\n') {
        lines += 1;
        longest = longest.max(line.len());
    }
    // A trailing newline does not open a new line
    if content.ends_with(b"\n") {
        lines -= 1;
    }
    let lines = lines.max(1);

    if content.len() / lines > thresholds.max_avg_line_len {
        return true;
    }
    if longest > thresholds.max_line_len {
        return true;
    }

    if content.len() >= thresholds.min_size_for_whitespace {
        let whitespace = content.iter().filter(|b| b.is_ascii_whitespace()).count();
        let ratio = whitespace as f64 / content.len() as f64;
        if ratio < thresholds.min_whitespace_ratio {
            return true;
        }
    }

    false
}
