//! Embedded PostgreSQL bootstrap for the Diesel adapter suites.
//!
//! `pg-embed-setup-unpriv` installs into `/var/tmp` by default. When
//! `PG_RUNTIME_DIR` or `PG_DATA_DIR` is missing both are pointed at a unique
//! directory under the target dir for the duration of the bootstrap, with
//! environment mutation serialised through `env-lock`.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

const TRANSIENT_PATTERNS: [&str; 6] = [
    "error decoding response body",
    "connection reset",
    "connection refused",
    "timed out",
    "temporarily unavailable",
    "dns error",
];

fn pg_embed_dir() -> PathBuf {
    std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("target"))
        .join("pg-embed")
}

fn unique_dirs() -> std::io::Result<(PathBuf, PathBuf)> {
    let base = pg_embed_dir().join(format!("orders-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok((runtime_dir, data_dir))
}

fn is_transient(error: &str) -> bool {
    let lower = error.to_lowercase();
    TRANSIENT_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

/// Start a cluster, retrying binary downloads that fail transiently.
pub fn test_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env = if needs_override {
        let (runtime_dir, data_dir) = unique_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir.to_string_lossy().into_owned())),
            ("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt == MAX_RETRIES || !is_transient(&last_error) {
                    break;
                }
                let delay = Duration::from_millis(RETRY_DELAY_MS << attempt);
                eprintln!("pg-embed: retrying in {delay:?} after: {last_error}");
                std::thread::sleep(delay);
            }
        }
    }
    Err(last_error)
}
