//! Optional on-disk reuse of the discovered record set.
//!
//! Discovery and header parsing are the expensive part of a run, so only the
//! record snapshot is cached; resolution is recomputed every time. The cache
//! file carries a schema version and is validated against the embedded JSON
//! Schema before reuse, so a stale or hand-edited file degrades to a miss
//! instead of feeding the engine bad records. A miss is never an error.
//!
//! Invalidation: the snapshot is rejected when any recorded entry file is no
//! longer readable, and the whole layer is bypassed when `MODPLAN_NOCACHE`
//! is set to a non-empty value other than `0`.

use crate::registry::ModuleRecord;
use anyhow::{Context, Result, bail};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::debug;

/// Environment flag that disables the cache layer for a run.
pub const NOCACHE_ENV: &str = "MODPLAN_NOCACHE";

/// File name used when the caller does not pick an explicit cache location.
pub const DEFAULT_CACHE_FILE: &str = ".modplan-cache.json";

const CACHE_SCHEMA_VERSION: &str = "modplan_cache_v1";
const CACHE_SCHEMA: &str = include_str!("../schema/plan_cache.schema.json");

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    schema_version: String,
    records: Vec<ModuleRecord>,
}

/// Compiled cache schema. The compile borrows `'static` into the Arc, so the
/// raw value must stay alive as long as the compiled form.
struct CacheSchema {
    compiled: JSONSchema,
    _raw: Arc<Value>,
}

/// Whether the current environment asks to bypass the cache entirely.
pub fn cache_disabled() -> bool {
    flag_enabled(env::var(NOCACHE_ENV).ok())
}

fn flag_enabled(value: Option<String>) -> bool {
    value.map(|v| !v.trim().is_empty() && v != "0").unwrap_or(false)
}

/// Default cache location for a modules root.
pub fn default_cache_path(modules_root: &Path) -> PathBuf {
    modules_root.join(DEFAULT_CACHE_FILE)
}

/// Load the cached record snapshot, if it is still trustworthy.
///
/// Every failure mode (missing file, invalid JSON, schema mismatch, an entry
/// file that went away) is a cache miss, logged at debug and reported as
/// `None` so callers fall back to a fresh discovery pass.
pub fn load_cached_records(cache_path: &Path) -> Option<Vec<ModuleRecord>> {
    match try_load(cache_path) {
        Ok(records) => {
            debug!(cache = %cache_path.display(), records = records.len(), "cache hit");
            Some(records)
        }
        Err(err) => {
            debug!(cache = %cache_path.display(), "cache miss: {err:#}");
            None
        }
    }
}

fn try_load(cache_path: &Path) -> Result<Vec<ModuleRecord>> {
    let data = fs::read_to_string(cache_path)
        .with_context(|| format!("reading cache {}", cache_path.display()))?;
    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("parsing cache {}", cache_path.display()))?;

    let schema = compiled_cache_schema()?;
    if let Err(errors) = schema.compiled.validate(&value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "cache {} failed schema validation:\n{}",
            cache_path.display(),
            details
        );
    }

    let cache: CacheFile =
        serde_json::from_value(value).context("decoding validated cache records")?;
    if cache.schema_version != CACHE_SCHEMA_VERSION {
        bail!(
            "cache schema_version '{}' is not '{CACHE_SCHEMA_VERSION}'",
            cache.schema_version
        );
    }

    // Validate the snapshot is still current: every recorded entry file must
    // still be readable, mirroring how the discovery layer would see them.
    for record in &cache.records {
        if fs::File::open(&record.entry).is_err() {
            bail!(
                "cached module entry {} is no longer readable",
                record.entry.display()
            );
        }
    }

    Ok(cache.records)
}

/// Persist a record snapshot atomically (temp file + rename), so readers
/// never observe a partially written cache.
pub fn store_records(cache_path: &Path, records: &[ModuleRecord]) -> Result<()> {
    let parent = cache_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file = CacheFile {
        schema_version: CACHE_SCHEMA_VERSION.to_string(),
        records: records.to_vec(),
    };

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("allocating cache temp file in {}", parent.display()))?;
    serde_json::to_writer_pretty(&mut tmp, &file).context("serializing cache records")?;
    tmp.persist(cache_path)
        .with_context(|| format!("writing cache {}", cache_path.display()))?;
    debug!(cache = %cache_path.display(), records = records.len(), "cache written");
    Ok(())
}

fn compiled_cache_schema() -> Result<CacheSchema> {
    let raw = Arc::new(
        serde_json::from_str::<Value>(CACHE_SCHEMA).context("parsing embedded cache schema")?,
    );
    let raw_static: &'static Value = unsafe { &*(Arc::as_ptr(&raw)) };
    let compiled =
        JSONSchema::compile(raw_static).context("compiling embedded cache schema")?;
    Ok(CacheSchema {
        compiled,
        _raw: raw,
    })
}
