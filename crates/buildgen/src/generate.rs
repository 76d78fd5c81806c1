//! The generation pipeline: load → validate → discover → emit.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{Configuration, ARM_TOOLS_KEY};
use crate::emit::{self, ArtifactSet, BIN_DIR, BUILD_DIR, GENERATED_DIR};
use crate::error::Error;
use crate::platform::Platform;
use crate::toolchain;

/// Summary of a completed generation run, for caller-side reporting.
#[derive(Debug)]
pub struct Report {
    /// Number of configuration entries validated and emitted.
    pub entries: usize,
    /// Discovered compiler prefix, if the toolchain scan matched.
    pub prefix: Option<String>,
    /// Companion tools absent from the toolchain directory (warned, not fatal).
    pub missing_tools: Vec<&'static str>,
    /// Every file written, in write order.
    pub written: Vec<PathBuf>,
}

/// One-shot generator for a working tree.
#[derive(Debug)]
pub struct Generator {
    root: PathBuf,
    platform: Platform,
}

impl Generator {
    /// Create a generator emitting into `root` with `platform` conventions.
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    /// Run the full pipeline against the configuration file at `config_path`.
    ///
    /// Steps, strictly in sequence: parse the configuration, recreate the
    /// `generated/` output directory, validate every configured path while
    /// buffering its variable lines, scan the toolchain directory for the
    /// compiler prefix, then write the whole artifact set.
    ///
    /// # Errors
    ///
    /// Any [`Error`]. A parse failure leaves the tree untouched; a path
    /// validation failure leaves `generated/` recreated but empty; an
    /// emission failure removes whatever it had written. No partial
    /// artifact survives a failed run.
    pub fn run(&self, config_path: &Path) -> Result<Report, Error> {
        let config = Configuration::load(config_path)?;
        debug!(entries = config.len(), "configuration loaded");

        emit::recreate_generated(&self.root)?;

        let mut artifacts = ArtifactSet::new(self.platform);
        for (key, value) in config.entries() {
            if !Path::new(value).is_dir() {
                return Err(Error::PathValidation {
                    key: key.to_owned(),
                    value: value.to_owned(),
                });
            }
            artifacts.push_entry(key, value);
        }

        let prefix = match config.get(ARM_TOOLS_KEY) {
            Some(dir) => toolchain::discover_prefix(Path::new(dir), self.platform)?,
            None => {
                warn!("`{ARM_TOOLS_KEY}` is not configured; skipping compiler discovery");
                None
            }
        };

        let mut missing_tools = Vec::new();
        if let Some(prefix) = &prefix {
            artifacts.push_prefix(prefix);
            if let Some(dir) = config.get(ARM_TOOLS_KEY) {
                missing_tools = toolchain::missing_companions(Path::new(dir), prefix, self.platform);
                for tool in &missing_tools {
                    warn!(tool = %tool, prefix = %prefix, "companion tool not found in toolchain directory");
                }
            }
        }

        let written = artifacts.write(&self.root, &config)?;
        Ok(Report {
            entries: config.len(),
            prefix,
            missing_tools,
            written,
        })
    }
}

/// Remove the build, binary, and generated output directories under `root`.
///
/// The library half of the `clean` subcommand; mirrors what the emitted
/// clean script does. Returns the directories actually removed — absent
/// ones are skipped, so cleaning an already-clean tree is a no-op.
///
/// # Errors
///
/// Returns [`Error::Io`] if an existing directory cannot be removed.
pub fn clean_tree(root: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut removed = Vec::new();
    for dir in [BUILD_DIR, BIN_DIR, GENERATED_DIR] {
        let path = root.join(dir);
        if path.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| Error::io(path.clone(), e))?;
            removed.push(path);
        } else {
            debug!(dir, "not present, nothing to clean");
        }
    }
    Ok(removed)
}
