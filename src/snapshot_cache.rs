use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::http_client::http_client;

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "cartola_terminal";
const CACHE_FILE: &str = "snapshots.json";

/// The upstream market moves slowly; a one-hour window matches how often
/// prices and statuses actually change between rounds.
const DEFAULT_TTL_SECS: u64 = 3600;
const MIN_TTL_SECS: u64 = 60;

static CACHE: Mutex<Option<SnapshotFile>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SnapshotFile {
    version: u32,
    entries: HashMap<String, Snapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    body: String,
    fetched_at: u64,
}

/// Read-through fetch keyed by endpoint name. A snapshot younger than the
/// TTL is served from the cache file without touching the network; anything
/// older is refetched and the file rewritten via tmp+rename. Fetch errors
/// propagate to the caller — a stale snapshot is never served as fresh.
pub fn fetch_cached(key: &str, url: &str) -> Result<String> {
    let ttl = cache_ttl_secs();
    let now = now_secs();

    let cached = {
        let mut guard = CACHE.lock().expect("snapshot cache lock poisoned");
        let cache = guard.get_or_insert_with(load_cache_file);
        cache.entries.get(key).cloned()
    };
    if let Some(snapshot) = cached
        && now.saturating_sub(snapshot.fetched_at) < ttl
    {
        return Ok(snapshot.body);
    }

    let client = http_client()?;
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body));
    }

    refresh_entry(
        key,
        Snapshot {
            body: body.clone(),
            fetched_at: now,
        },
    );
    Ok(body)
}

pub fn cache_ttl_secs() -> u64 {
    std::env::var("MARKET_CACHE_TTL_SECS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TTL_SECS)
        .max(MIN_TTL_SECS)
}

fn refresh_entry(key: &str, snapshot: Snapshot) {
    let mut guard = CACHE.lock().expect("snapshot cache lock poisoned");
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(key.to_string(), snapshot);
    let _ = save_cache_file(cache);
}

fn load_cache_file() -> SnapshotFile {
    let Some(path) = cache_path() else {
        return SnapshotFile::default();
    };
    let Some(raw) = fs::read_to_string(path).ok() else {
        return SnapshotFile::default();
    };
    let cache = serde_json::from_str::<SnapshotFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return SnapshotFile::default();
    }
    cache
}

fn save_cache_file(cache: &SnapshotFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(dir).ok();
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize snapshot cache")?;
    fs::write(&tmp, json).context("write snapshot cache")?;
    fs::rename(&tmp, &path).context("swap snapshot cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
