//! Filesystem discovery of candidate modules.
//!
//! A modules root holds one subdirectory per candidate module; the module's
//! entry file is named after its directory (`<root>/<name>/<name>.mod`).
//! Plain files at the root level are skipped, matching how module trees are
//! laid out. Discovery order is ascending directory name so every downstream
//! stage sees a deterministic sequence for a fixed tree.

use crate::module_metadata::ModuleHeader;
use crate::registry::ModuleRecord;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Entry file extension looked for inside each module directory.
const ENTRY_EXTENSION: &str = "mod";

/// Expected entry file for a module directory.
pub fn module_entry_path(module_dir: &Path) -> Option<PathBuf> {
    let name = module_dir.file_name()?.to_str()?;
    Some(module_dir.join(format!("{name}.{ENTRY_EXTENSION}")))
}

/// Collect the entry files of every module under `root`, keyed by directory
/// name. Directories without a matching entry file are skipped.
pub fn collect_module_entries(root: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut entries = BTreeMap::new();
    let listing = fs::read_dir(root)
        .with_context(|| format!("reading modules root {}", root.display()))?;
    for item in listing {
        let item = item?;
        let path = item.path();
        if !path.is_dir() {
            continue;
        }
        let Some(entry) = module_entry_path(&path) else {
            continue;
        };
        if !entry.is_file() {
            debug!(dir = %path.display(), "skipping module dir without entry file");
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        entries.insert(name.to_string(), entry);
    }
    Ok(entries)
}

/// Discover all candidate modules under `root`.
///
/// Returns one record per module directory, in discovery order. An empty
/// root yields an empty list rather than an error; a missing or unreadable
/// root is an error.
pub fn discover_modules(root: &Path) -> Result<Vec<ModuleRecord>> {
    let entries = collect_module_entries(root)?;
    let mut records = Vec::with_capacity(entries.len());
    for (dir_name, entry) in entries {
        let header = ModuleHeader::from_entry(&entry)?;
        let record = ModuleRecord::from_header(header, &dir_name, entry);
        debug!(module = %record.id, entry = %record.entry.display(), "discovered module");
        records.push(record);
    }
    if records.is_empty() {
        debug!(root = %root.display(), "no modules discovered");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_module(root: &Path, dir: &str, header: &str) {
        let module_dir = root.join(dir);
        fs::create_dir_all(&module_dir).expect("module dir");
        fs::write(module_dir.join(format!("{dir}.mod")), header).expect("entry file");
    }

    #[test]
    fn discovers_modules_in_directory_name_order() {
        let temp = TempDir::new().expect("temp dir");
        write_module(temp.path(), "zeta", "Module Name: Zeta\n");
        write_module(temp.path(), "alpha", "Module Name: Alpha\nProvides: x\n");

        let records = discover_modules(temp.path()).expect("discover");
        let ids: Vec<&str> = records.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn skips_plain_files_and_dirs_without_entry() {
        let temp = TempDir::new().expect("temp dir");
        fs::write(temp.path().join("stray.mod"), "Module Name: Stray\n").unwrap();
        fs::create_dir(temp.path().join("empty")).unwrap();
        write_module(temp.path(), "real", "Module Name: Real\n");

        let records = discover_modules(temp.path()).expect("discover");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.0, "real");
    }

    #[test]
    fn empty_root_yields_empty_record_list() {
        let temp = TempDir::new().expect("temp dir");
        let records = discover_modules(temp.path()).expect("discover");
        assert!(records.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = TempDir::new().expect("temp dir");
        let missing = temp.path().join("does-not-exist");
        assert!(discover_modules(&missing).is_err());
    }
}
