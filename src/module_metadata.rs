//! Lightweight parsing of module entry files for header metadata.
//!
//! The helpers here scrape the leading portion of a module entry file for the
//! fields the planner needs (module name, version, capability lists) without
//! interpreting the rest of the file. Parsing is line-oriented and
//! intentionally errs on the side of under-reporting when a header looks
//! malformed, because the outputs drive activation ordering.

use crate::split_list;
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Only the leading slice of an entry file may carry header fields; payload
/// past this window is never inspected.
const HEADER_SCAN_BYTES: u64 = 8 * 1024;

/// Header field names recognized in module entry files.
const FIELD_NAME: &str = "Module Name";
const FIELD_VERSION: &str = "Version";
const FIELD_DESCRIPTION: &str = "Description";
const FIELD_AUTHOR: &str = "Author";
const FIELD_DEPENDS: &str = "Depends";
const FIELD_PROVIDES: &str = "Provides";

#[derive(Debug, Clone, Default)]
/// Raw header fields scraped from a module entry file.
///
/// Fields remain `None` when the header does not declare them; list fields
/// parse to empty vectors. Callers convert this into a typed record with
/// `ModuleRecord::from_header`.
pub struct ModuleHeader {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub depends: Vec<String>,
    pub provides: Vec<String>,
}

impl ModuleHeader {
    /// Scrape header fields from an entry file on disk.
    ///
    /// Reads at most [`HEADER_SCAN_BYTES`] so a large payload file cannot
    /// stall discovery.
    pub fn from_entry(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut contents = String::new();
        file.take(HEADER_SCAN_BYTES)
            .read_to_string(&mut contents)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(Self::parse(&contents))
    }

    /// Parse header fields from already-loaded entry contents.
    pub fn parse(contents: &str) -> Self {
        Self {
            name: header_field(contents, FIELD_NAME),
            version: header_field(contents, FIELD_VERSION),
            description: header_field(contents, FIELD_DESCRIPTION),
            author: header_field(contents, FIELD_AUTHOR),
            depends: header_list(contents, FIELD_DEPENDS),
            provides: header_list(contents, FIELD_PROVIDES),
        }
    }
}

/// Extract a single `Key: Value` header field. First match wins.
fn header_field(contents: &str, key: &str) -> Option<String> {
    for line in contents.lines() {
        let stripped = strip_comment_markers(line);
        let Some(rest) = stripped.strip_prefix(key) else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(value) = rest.strip_prefix(':') else {
            continue;
        };
        let value = value.trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

/// Extract a comma- or whitespace-separated capability list field.
fn header_list(contents: &str, key: &str) -> Vec<String> {
    header_field(contents, key)
        .map(|value| split_list(&value))
        .unwrap_or_default()
}

/// Drop leading comment markers so headers survive being embedded in a
/// comment block (`#`, `//`, `;`, or a `*` continuation line).
fn strip_comment_markers(line: &str) -> &str {
    let trimmed = line.trim_start();
    for marker in ["#", "//", ";", "*"] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    trimmed
}
