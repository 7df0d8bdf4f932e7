//! Hourly sweep of the saved-cards directory. Cards are throwaway
//! artifacts; anything older than the TTL is deleted.

use crate::config::CardConfig;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Start the periodic sweep. The first pass runs immediately, clearing
/// leftovers from a previous run.
pub fn spawn(cfg: Arc<CardConfig>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cfg.cleanup_interval);
        loop {
            ticker.tick().await;
            match sweep(&cfg.cards_dir, cfg.card_ttl) {
                Ok(0) => {}
                Ok(removed) => info!(removed, "expired cards cleaned up"),
                Err(e) => warn!(error = %e, "card cleanup sweep failed"),
            }
        }
    })
}

/// Delete regular files under `dir` whose mtime is older than `ttl`.
/// A missing directory is an empty sweep, and files that vanish midway
/// (a concurrent sweep, manual deletion) are not errors.
pub fn sweep(dir: &Path, ttl: Duration) -> io::Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };
    let now = SystemTime::now();
    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(_) => continue,
        };
        if !meta.is_file() {
            continue;
        }
        let expired = meta
            .modified()
            .ok()
            .and_then(|mtime| now.duration_since(mtime).ok())
            .map(|age| age > ttl)
            .unwrap_or(false);
        if !expired {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %entry.path().display(), error = %e, "could not remove card"),
        }
    }
    Ok(removed)
}
