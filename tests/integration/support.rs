//! Shared fixtures for integration tests.

use lighthouse::config::LighthouseConfig;
use lighthouse::store::StoreBackend;
use lighthouse::tooling::cli::CliContext;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

pub const BACKENDS: [StoreBackend; 2] = [StoreBackend::Sled, StoreBackend::Sqlite];

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Write `content` to `root/rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Two environments: `Redwood-City` as a three-level root of its own and
/// `developer1` inside a four-level tree.
pub fn sample_tree(temp: &TempDir) -> (PathBuf, PathBuf) {
    let rwc = temp.path().join("Redwood-City");
    write(&rwc, "storm/h2/sth2.prop", "testk=testv\nmongo.port=27017\n");
    write(&rwc, "zookeeper/h1/zoo.cfg", "[zk]\nhost = zk1\n");

    let tree = temp.path().join("tree");
    write(&tree, "developer1/storm/h2/sth2.prop", "testk=devv\n");
    write(&tree, "developer1/elastic/h3/es.yaml", "cluster:\n  name: dev\n");
    write(&tree, "developer1/elastic/h3/README.md", "not a config file");
    (rwc, tree)
}

/// Context over a fresh store of `backend` inside `temp`.
pub fn context(temp: &TempDir, backend: StoreBackend) -> CliContext {
    let mut config = LighthouseConfig::default();
    config.storage.backend = backend;
    config.storage.path = Some(temp.path().join(format!("store-{:?}", backend)));
    config.storage.batch_size = 2;
    CliContext::new(config).unwrap()
}

/// Run `f` with XDG config and data homes pointed inside `temp`.
pub fn with_xdg_env<F: FnOnce()>(temp: &TempDir, f: F) {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = ["XDG_CONFIG_HOME", "XDG_DATA_HOME"]
        .into_iter()
        .map(|k| (k, std::env::var(k).ok()))
        .collect();
    std::env::set_var("XDG_CONFIG_HOME", temp.path().join("config"));
    std::env::set_var("XDG_DATA_HOME", temp.path().join("data"));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    if let Err(panic) = result {
        std::panic::resume_unwind(panic);
    }
}
