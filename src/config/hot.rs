//! Calculator with hot-reload from a config file.
//!
//! On each `current()` call we check the file's modified time and rebuild the
//! calculator if it changed. Callers get an `Arc` snapshot, so a reload never
//! swaps the config under a computation that is already running. A file that
//! fails to load or validate is reported and the previous calculator stays.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
    time::SystemTime,
};

use tracing::{info, warn};

use super::{FootprintConfig, DEFAULT_FOOTPRINT_CONFIG_PATH};
use crate::calculator::FootprintCalculator;
use crate::telemetry::LOG_TARGET;

#[derive(Debug)]
pub struct HotReloadCalculator {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    calculator: Arc<FootprintCalculator>,
    last_modified: Option<SystemTime>,
}

impl HotReloadCalculator {
    /// Create with a path (defaults to "config/footprint.toml" if `None`).
    /// Starts from built-in defaults until the file is first seen.
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FOOTPRINT_CONFIG_PATH));
        Self {
            path,
            inner: RwLock::new(State {
                calculator: Arc::new(FootprintCalculator::default()),
                last_modified: None,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Latest calculator, reloading if the config file changed.
    pub fn current(&self) -> Arc<FootprintCalculator> {
        // Fast path: compare mtime under the read lock.
        let mtime = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(m) => m,
            // Missing file: keep whatever we have.
            Err(_) => return self.snapshot(),
        };
        {
            let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            if guard.last_modified == Some(mtime) {
                return Arc::clone(&guard.calculator);
            }
        }

        // Slow path: reload with write lock, double-checking for races.
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.last_modified != Some(mtime) {
            // Record the mtime even on failure so a broken file is reported once.
            guard.last_modified = Some(mtime);
            match FootprintConfig::load_from(&self.path).and_then(FootprintCalculator::new) {
                Ok(calc) => {
                    info!(target: LOG_TARGET, path = %self.path.display(), "footprint config reloaded");
                    guard.calculator = Arc::new(calc);
                }
                Err(e) => {
                    warn!(
                        target: LOG_TARGET,
                        path = %self.path.display(),
                        error = %format!("{e:#}"),
                        "footprint config rejected; keeping previous"
                    );
                }
            }
        }
        Arc::clone(&guard.calculator)
    }

    fn snapshot(&self) -> Arc<FootprintCalculator> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard.calculator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io::Write, thread, time::Duration};

    fn write_config(path: &Path, body: &str) {
        let mut f = fs::File::create(path).unwrap();
        write!(f, "{body}").unwrap();
        f.sync_all().unwrap();
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let hot = HotReloadCalculator::new(Some(&dir.path().join("absent.toml")));
        let calc = hot.current();
        assert_eq!(calc.config(), &FootprintConfig::default());
    }

    #[test]
    fn loads_and_hot_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("footprint.toml");

        write_config(&path, "[scoring]\nwine_water_ratio = 2.0\n");
        let hot = HotReloadCalculator::new(Some(&path));
        let c1 = hot.current();
        assert_eq!(c1.config().scoring.wine_water_ratio, 2.0);

        // Ensure different mtime (coarse filesystem granularity).
        thread::sleep(Duration::from_millis(1100));
        write_config(&path, "[scoring]\nwine_water_ratio = 3.0\n");

        let c2 = hot.current();
        assert_eq!(c2.config().scoring.wine_water_ratio, 3.0);
        // The earlier snapshot is untouched.
        assert_eq!(c1.config().scoring.wine_water_ratio, 2.0);
    }

    #[test]
    fn invalid_file_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("footprint.toml");

        write_config(&path, "[scoring]\nwine_water_ratio = 2.0\n");
        let hot = HotReloadCalculator::new(Some(&path));
        assert_eq!(hot.current().config().scoring.wine_water_ratio, 2.0);

        thread::sleep(Duration::from_millis(1100));
        write_config(&path, "[scoring]\nfull_reuse_reduction = 5.0\n");

        assert_eq!(hot.current().config().scoring.wine_water_ratio, 2.0);
        assert_eq!(hot.current().config().scoring.full_reuse_reduction, 0.4);
    }
}
