use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use crate::error::{PipelineError, Result};

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    WS_RE.replace_all(s.trim(), " ").into_owned()
}

/// Lowercase, whitespace and underscores joined by single hyphens.
///
/// `"Two-dimensional languages"` becomes `"two-dimensional-languages"`.
pub fn canonical_label(label: &str) -> String {
    let lower = label.trim().to_lowercase();
    lower
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .join("-")
}

/// Comparison key that ignores case and all punctuation/whitespace.
pub fn label_key(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Last non-empty path segment of a URL, percent-decoded.
pub fn last_path_segment(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    if segment.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    let decoded = decoded.trim();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded.to_string())
    }
}

/// Write `bytes` to a temporary sibling of `path`, then rename into place.
///
/// A failure at any point leaves the previous file (if any) untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = Path::new(&tmp_name);

    let written = fs::File::create(tmp)
        .and_then(|mut f| {
            f.write_all(bytes)?;
            f.sync_all()
        })
        .and_then(|_| fs::rename(tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(tmp);
        return Err(PipelineError::io(path, e));
    }
    Ok(())
}
