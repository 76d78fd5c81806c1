//! Error taxonomy for a bootstrap run.
//!
//! Every failure is a static configuration or filesystem defect the user
//! must fix before re-running; nothing here is transient, so nothing is
//! retried.

use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Everything that can abort a generation run.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The configuration file is missing, unreadable, empty, or not a
    /// string-to-string mapping. Raised before any filesystem mutation.
    #[error("configuration file {path:?} is empty or malformed: {reason}")]
    Configuration {
        /// Path of the file that failed to load.
        path: PathBuf,
        /// Human-readable parse/read failure description.
        reason: String,
    },

    /// A key required by the selected platform mode is absent from the
    /// mapping (the Windows build script references configured tool paths).
    #[error("required configuration key `{key}` is missing")]
    MissingKey {
        /// The absent key.
        key: &'static str,
    },

    /// A configured value does not resolve to an existing directory.
    #[error("path does not exist or is not a directory: `{key}` = \"{value}\"")]
    PathValidation {
        /// Offending configuration key.
        key: String,
        /// The raw value as it appeared in the configuration file.
        value: String,
    },

    /// The generated output directory could not be deleted and recreated.
    #[error("could not recreate output directory {path:?}")]
    DirectoryCreation {
        /// The output directory path.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// A filesystem operation failed while reading the toolchain directory
    /// or writing artifacts. Emission removes everything it already wrote
    /// before surfacing this.
    #[error("I/O failure on {path:?}")]
    Io {
        /// Path the failed operation was addressing.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Shorthand for wrapping an [`std::io::Error`] with the path it hit.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
