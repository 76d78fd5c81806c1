//! Generated artifact composition and emission.
//!
//! Variable files are buffered in memory while the configuration is
//! validated and only hit the disk once everything has passed, so a failed
//! run can never leave a half-written artifact. The `generated/` directory
//! is deleted and recreated up front; each run fully supersedes the
//! previous one's outputs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Configuration, CMAKE_PATH_KEY, EABI_PREFIX_KEY, MINGW_PATH_KEY};
use crate::error::Error;
use crate::platform::Platform;

/// Directory the variable files are written into, relative to the run root.
pub const GENERATED_DIR: &str = "generated";

/// CMake include file name under [`GENERATED_DIR`].
pub const CMAKE_FILE: &str = "CMakeConfigFile.cmake";

/// Shell/batch variable file name under [`GENERATED_DIR`].
pub const CMD_FILE: &str = "CMDConfigFile.cmd";

/// CMake build directory the emitted scripts create and remove.
pub const BUILD_DIR: &str = "cmake-build-debug";

/// Binary output directory the emitted scripts remove.
pub const BIN_DIR: &str = "bin";

const POSIX_BUILD_SCRIPT: &str = "\
rm -rf cmake-build-debug
rm -rf bin
mkdir cmake-build-debug
cd cmake-build-debug
cmake ..
make -j8
cd ..
";

const POSIX_CLEAN_SCRIPT: &str = "\
rm -rf cmake-build-debug
rm -rf bin
";

const WINDOWS_CLEAN_SCRIPT: &str = "\
@ECHO OFF
rd /s /q \"cmake-build-debug\" > nul 2>&1
rd /s /q \"bin\" > nul 2>&1
rd /s /q \"generated\" > nul 2>&1
";

/// Delete and recreate the `generated/` directory under `root`.
///
/// # Errors
///
/// Returns [`Error::DirectoryCreation`]; a run that cannot (re)create its
/// output directory is aborted rather than left to fail write-by-write.
pub fn recreate_generated(root: &Path) -> Result<(), Error> {
    let dir = root.join(GENERATED_DIR);
    if dir.exists() {
        fs::remove_dir_all(&dir).map_err(|e| Error::DirectoryCreation {
            path: dir.clone(),
            source: e,
        })?;
    }
    fs::create_dir(&dir).map_err(|e| Error::DirectoryCreation {
        path: dir.clone(),
        source: e,
    })?;
    debug!(dir = %dir.display(), "output directory recreated");
    Ok(())
}

/// The full output set of one run, composed in memory.
///
/// Entries must be pushed in configuration document order; lines are
/// emitted in push order.
#[derive(Debug)]
pub struct ArtifactSet {
    platform: Platform,
    cmake: String,
    cmd: String,
}

impl ArtifactSet {
    /// Start an empty artifact set for `platform`.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            cmake: String::new(),
            cmd: String::new(),
        }
    }

    /// Append one validated configuration entry to both variable files.
    ///
    /// The CMake line always uses forward slashes; the cmd line uses the
    /// platform's native separators.
    pub fn push_entry(&mut self, key: &str, value: &str) {
        let cmake_value = self.platform.cmake_path(value);
        let native_value = self.platform.native_path(value);
        self.cmake
            .push_str(&format!("SET({key} \"{cmake_value}\")\n"));
        self.cmd.push_str(&format!("set {key}=\"{native_value}\"\n"));
    }

    /// Append the derived compiler-prefix variable.
    pub fn push_prefix(&mut self, prefix: &str) {
        self.cmake
            .push_str(&format!("SET({EABI_PREFIX_KEY} \"{prefix}\")\n"));
        self.cmd
            .push_str(&format!("set {EABI_PREFIX_KEY}=\"{prefix}\"\n"));
    }

    /// Render the top-level build script for this platform.
    ///
    /// # Errors
    ///
    /// In Windows mode the script invokes CMake and MinGW through
    /// configured install paths; a missing key is [`Error::MissingKey`].
    fn build_script(&self, config: &Configuration) -> Result<String, Error> {
        match self.platform {
            Platform::Posix => Ok(POSIX_BUILD_SCRIPT.to_owned()),
            Platform::Windows => {
                let cmake_dir = config
                    .get(CMAKE_PATH_KEY)
                    .ok_or(Error::MissingKey { key: CMAKE_PATH_KEY })?;
                let mingw_dir = config
                    .get(MINGW_PATH_KEY)
                    .ok_or(Error::MissingKey { key: MINGW_PATH_KEY })?;
                let cmake_dir = self.platform.native_path(cmake_dir);
                let mingw_dir = self.platform.native_path(mingw_dir);
                Ok(format!(
                    "@ECHO OFF\n\
                     rd /s /q \"cmake-build-debug\" > nul 2>&1\n\
                     rd /s /q \"bin\" > nul 2>&1\n\
                     mkdir cmake-build-debug\n\
                     cd cmake-build-debug\n\
                     {cmake_dir}\\cmake .. -G \"CodeBlocks - MinGW Makefiles\"\n\
                     {mingw_dir}\\mingw32-make -j8\n\
                     cd ..\n"
                ))
            }
        }
    }

    /// Render the top-level clean script for this platform.
    fn clean_script(&self) -> &'static str {
        match self.platform {
            Platform::Posix => POSIX_CLEAN_SCRIPT,
            Platform::Windows => WINDOWS_CLEAN_SCRIPT,
        }
    }

    /// Write the whole output set under `root` and return the written
    /// paths in write order.
    ///
    /// The scripts are rendered before the first write, so a missing
    /// Windows key aborts with nothing on disk. If a later write fails,
    /// everything already written is removed before the error surfaces.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] from script rendering, or [`Error::Io`] from
    /// the filesystem.
    pub fn write(&self, root: &Path, config: &Configuration) -> Result<Vec<PathBuf>, Error> {
        let build = self.build_script(config)?;
        let clean = self.clean_script();

        let outputs: [(PathBuf, &str); 4] = [
            (root.join(GENERATED_DIR).join(CMAKE_FILE), self.cmake.as_str()),
            (root.join(GENERATED_DIR).join(CMD_FILE), self.cmd.as_str()),
            (root.join(self.platform.build_script_name()), build.as_str()),
            (root.join(self.platform.clean_script_name()), clean),
        ];

        let mut written = Vec::with_capacity(outputs.len());
        for (path, contents) in &outputs {
            if let Err(e) = fs::write(path, contents) {
                remove_best_effort(&written);
                return Err(Error::io(path.clone(), e));
            }
            written.push(path.clone());
        }

        if self.platform == Platform::Posix {
            if let Err(e) = mark_executable(&written[2..]) {
                remove_best_effort(&written);
                return Err(e);
            }
        }
        Ok(written)
    }
}

/// Set the executable bit on each path. No-op on hosts without that notion.
#[cfg(unix)]
fn mark_executable(paths: &[PathBuf]) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;
    for path in paths {
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .map_err(|e| Error::io(path.clone(), e))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_paths: &[PathBuf]) -> Result<(), Error> {
    Ok(())
}

fn remove_best_effort(paths: &[PathBuf]) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(text: &str) -> Configuration {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("configurations.yaml");
        fs::write(&path, text).unwrap();
        Configuration::load(&path).unwrap()
    }

    #[test]
    fn entry_lines_use_platform_separators() {
        let mut set = ArtifactSet::new(Platform::Windows);
        set.push_entry("MINGW_ENV_PATH", "C:/mingw/bin");
        assert_eq!(set.cmake, "SET(MINGW_ENV_PATH \"C:/mingw/bin\")\n");
        assert_eq!(set.cmd, "set MINGW_ENV_PATH=\"C:\\mingw\\bin\"\n");
    }

    #[test]
    fn prefix_lines_carry_derived_key() {
        let mut set = ArtifactSet::new(Platform::Posix);
        set.push_prefix("arm-none-eabi-");
        assert_eq!(set.cmake, "SET(EABI_PREFIX \"arm-none-eabi-\")\n");
        assert_eq!(set.cmd, "set EABI_PREFIX=\"arm-none-eabi-\"\n");
    }

    #[test]
    fn recreate_wipes_previous_outputs() {
        let tmp = TempDir::new().unwrap();
        recreate_generated(tmp.path()).unwrap();
        fs::write(tmp.path().join(GENERATED_DIR).join("stale"), b"x").unwrap();
        recreate_generated(tmp.path()).unwrap();
        let count = fs::read_dir(tmp.path().join(GENERATED_DIR)).unwrap().count();
        assert_eq!(count, 0);
    }

    #[test]
    fn windows_build_script_interpolates_tool_paths() {
        let set = ArtifactSet::new(Platform::Windows);
        let cfg = config(
            "CLION_CMAKE_PATH: C:/clion/cmake/bin\nMINGW_ENV_PATH: C:/mingw/bin\n",
        );
        let script = set.build_script(&cfg).unwrap();
        assert!(script.starts_with("@ECHO OFF\n"));
        assert!(script.contains("C:\\clion\\cmake\\bin\\cmake .. -G \"CodeBlocks - MinGW Makefiles\""));
        assert!(script.contains("C:\\mingw\\bin\\mingw32-make -j8"));
    }

    #[test]
    fn windows_write_without_tool_paths_is_missing_key() {
        let tmp = TempDir::new().unwrap();
        recreate_generated(tmp.path()).unwrap();
        let set = ArtifactSet::new(Platform::Windows);
        let cfg = config("SDK_DIR: C:/sdk\n");
        let err = set.write(tmp.path(), &cfg).unwrap_err();
        assert!(matches!(err, Error::MissingKey { key: CMAKE_PATH_KEY }));
        // Nothing was written.
        let count = fs::read_dir(tmp.path().join(GENERATED_DIR)).unwrap().count();
        assert_eq!(count, 0);
    }

    #[test]
    fn write_produces_the_fixed_output_set() {
        let tmp = TempDir::new().unwrap();
        recreate_generated(tmp.path()).unwrap();
        let mut set = ArtifactSet::new(Platform::Posix);
        set.push_entry("SDK_DIR", "/opt/sdk");
        let cfg = config("SDK_DIR: /opt/sdk\n");
        let written = set.write(tmp.path(), &cfg).unwrap();
        assert_eq!(written.len(), 4);
        assert!(tmp.path().join(GENERATED_DIR).join(CMAKE_FILE).is_file());
        assert!(tmp.path().join(GENERATED_DIR).join(CMD_FILE).is_file());
        assert!(tmp.path().join("BUILD").is_file());
        assert!(tmp.path().join("CLEAN").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn posix_scripts_are_executable() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        recreate_generated(tmp.path()).unwrap();
        let set = ArtifactSet::new(Platform::Posix);
        let cfg = config("SDK_DIR: /opt/sdk\n");
        set.write(tmp.path(), &cfg).unwrap();
        for script in ["BUILD", "CLEAN"] {
            let mode = fs::metadata(tmp.path().join(script)).unwrap().permissions().mode();
            assert_ne!(mode & 0o111, 0, "{script} should be executable");
        }
    }
}
