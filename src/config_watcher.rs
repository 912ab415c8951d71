//! Hot-reload watcher for score weights in `config.toml`.
//!
//! [`WeightsWatcher`] uses the `notify` crate to watch `config.toml` for
//! file-system changes. When a change is detected it re-parses the
//! `[scoring]` table only and atomically swaps the shared
//! `Arc<RwLock<ScoringWeights>>`. Everything else in the file requires a
//! restart.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use lead_desk::config_watcher::WeightsWatcher;
//!
//! let watcher = WeightsWatcher::new(Path::new("config.toml")).expect("watcher");
//! let weights = watcher.weights(); // Arc<RwLock<ScoringWeights>>
//! ```
//!
//! The `std::sync::RwLock` is updated from inside the synchronous `notify`
//! callback, which has no async context.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use tracing::{info, warn};

use crate::scoring::weights::ScoringWeights;
use crate::{AppError, Result};

/// Shared, hot-reloadable weights.
pub type SharedWeights = Arc<RwLock<ScoringWeights>>;

/// Only the `[scoring]` table; all other keys are ignored.
#[derive(Debug, Deserialize)]
struct ScoringOnlyConfig {
    #[serde(default)]
    scoring: ScoringWeights,
}

/// Parse and validate only the `[scoring]` table from a TOML file.
///
/// # Errors
///
/// Returns `AppError::Config` if the file cannot be read, contains invalid
/// TOML, or the weights fail validation.
pub fn parse_scoring_weights(path: &Path) -> Result<ScoringWeights> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        AppError::Config(format!("failed to read config for weights hot-reload: {err}"))
    })?;
    let parsed: ScoringOnlyConfig = toml::from_str(&raw)
        .map_err(|err| AppError::Config(format!("failed to parse scoring weights: {err}")))?;
    parsed.scoring.validate()?;
    Ok(parsed.scoring)
}

fn is_config_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Hot-reload watcher for score weights.
///
/// Dropping a `WeightsWatcher` stops the underlying OS watch.
pub struct WeightsWatcher {
    _watcher: RecommendedWatcher,
    weights: SharedWeights,
}

impl WeightsWatcher {
    /// Watch `config_path` for changes to the `[scoring]` table.
    ///
    /// If the initial parse fails the watcher starts from default weights
    /// and logs a warning.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the `notify` watcher cannot be created
    /// or the path cannot be watched.
    pub fn new(config_path: &Path) -> Result<Self> {
        let initial = parse_scoring_weights(config_path).unwrap_or_else(|err| {
            warn!(%err, path = %config_path.display(), "failed to load initial weights; using defaults");
            ScoringWeights::default()
        });

        let weights: SharedWeights = Arc::new(RwLock::new(initial));
        let weights_for_callback = Arc::clone(&weights);
        let path_for_callback: PathBuf = config_path.to_path_buf();

        let mut watcher = notify::recommended_watcher(
            move |result: std::result::Result<Event, notify::Error>| match result {
                Ok(event) if is_config_change(&event) => {
                    match parse_scoring_weights(&path_for_callback) {
                        Ok(reloaded) => match weights_for_callback.write() {
                            Ok(mut guard) => {
                                *guard = reloaded;
                                info!(
                                    path = %path_for_callback.display(),
                                    "hot-reloaded scoring weights"
                                );
                            }
                            Err(err) => {
                                warn!(%err, "weights RwLock poisoned during hot-reload");
                            }
                        },
                        Err(err) => {
                            warn!(
                                %err,
                                path = %path_for_callback.display(),
                                "failed to reload weights, keeping previous values"
                            );
                        }
                    }
                }
                Err(err) => {
                    warn!(%err, "config file watcher error");
                }
                _ => {}
            },
        )
        .map_err(|err| AppError::Config(format!("failed to create config file watcher: {err}")))?;

        // Watch the parent directory so rename-based saves are seen.
        let watch_target = config_path
            .parent()
            .filter(|p| p != &Path::new(""))
            .unwrap_or(config_path);

        watcher
            .watch(watch_target, RecursiveMode::NonRecursive)
            .map_err(|err| {
                AppError::Config(format!(
                    "failed to watch config path '{}': {err}",
                    watch_target.display()
                ))
            })?;

        info!(path = %config_path.display(), "weights watcher started");

        Ok(Self {
            _watcher: watcher,
            weights,
        })
    }

    /// Shared weights handle.
    #[must_use]
    pub fn weights(&self) -> SharedWeights {
        Arc::clone(&self.weights)
    }

    /// Copy of the weights currently in effect.
    #[must_use]
    pub fn current(&self) -> ScoringWeights {
        self.weights
            .read()
            .map_or_else(|poisoned| *poisoned.into_inner(), |guard| *guard)
    }
}
