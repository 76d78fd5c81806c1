//! Cross-compiler prefix discovery.
//!
//! The configured ARM toolchain directory is listed non-recursively and
//! scanned for the cross C compiler (`*-gcc`, `*-gcc.exe` with an `eabi`
//! marker on Windows). The surviving file name minus the compiler name is
//! the toolchain prefix, e.g. `arm-none-eabi-gcc` → `arm-none-eabi-`.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::platform::Platform;

/// Executables expected to sit next to the compiler under the same prefix.
/// Absences are reported for warning-level logging, never treated as fatal.
pub const COMPANION_TOOLS: &[&str] = &["as", "ar", "objcopy", "objdump", "size", "gdb"];

/// Scan `dir` for the cross C compiler and derive the toolchain prefix.
///
/// Entries are visited in lexicographic file-name order, so with more than
/// one matching compiler the first name wins deterministically. Zero
/// matches yields `Ok(None)`: the prefix variable is simply not emitted.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory cannot be listed. Callers
/// validate `dir` exists beforehand, so this only fires on races or
/// permission problems.
pub fn discover_prefix(dir: &Path, platform: Platform) -> Result<Option<String>, Error> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .filter_map(|entry| {
            entry
                .ok()
                .and_then(|e| e.file_name().into_string().ok())
        })
        .collect();
    names.sort();

    for name in &names {
        if platform.is_cross_gcc(name) {
            if let Some(prefix) = platform.strip_cross_gcc(name) {
                debug!(compiler = %name, prefix = %prefix, "cross compiler found");
                return Ok(Some(prefix.to_owned()));
            }
        }
    }
    debug!(dir = %dir.display(), "no cross compiler in toolchain directory");
    Ok(None)
}

/// Check which companion tools are missing for `prefix` under `dir`.
///
/// Returns the bare tool names (`as`, `ar`, ...) whose executables were not
/// found. A complete GNU toolchain install returns an empty list.
pub fn missing_companions(dir: &Path, prefix: &str, platform: Platform) -> Vec<&'static str> {
    COMPANION_TOOLS
        .iter()
        .copied()
        .filter(|tool| {
            let file = format!("{prefix}{tool}{}", platform.exe_suffix());
            !dir.join(file).exists()
        })
        .collect()
}
