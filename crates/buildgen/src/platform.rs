//! Platform mode — path conventions and script shapes for the two targets.
//!
//! The generator emits different artifacts on POSIX and on Windows (path
//! separators, script file names, compiler executable naming). All of
//! those differences live behind this one enum so the pipeline itself has
//! a single code path; the mode defaults to the host and can be overridden
//! for cross-generation.

/// Which platform convention the generated artifacts follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// POSIX shell conventions: forward slashes, `BUILD`/`CLEAN` scripts
    /// marked executable, `make` driven builds.
    Posix,
    /// Windows batch conventions: backslashes, `BUILD.BAT`/`CLEAN.BAT`,
    /// CMake and MinGW invoked through configured install paths.
    Windows,
}

impl Platform {
    /// The platform the generator is currently running on.
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Normalize a configured value into this platform's native path form.
    ///
    /// Separators are rewritten to the native convention and a trailing
    /// separator is dropped (a filesystem root is left untouched).
    pub fn native_path(self, raw: &str) -> String {
        let mut path = match self {
            Self::Posix => raw.replace('\\', "/"),
            Self::Windows => raw.replace('/', "\\"),
        };
        let sep = self.separator();
        while path.len() > 1 && path.ends_with(sep) {
            path.pop();
        }
        path
    }

    /// Normalize a configured value into the forward-slash form CMake
    /// expects on every host.
    pub fn cmake_path(self, raw: &str) -> String {
        self.native_path(raw).replace('\\', "/")
    }

    fn separator(self) -> char {
        match self {
            Self::Posix => '/',
            Self::Windows => '\\',
        }
    }

    /// Returns `true` when `file_name` is the cross C compiler executable
    /// for this platform.
    ///
    /// POSIX matches `*-gcc`; Windows additionally requires the `eabi`
    /// ABI marker in the name and the `.exe` extension.
    pub(crate) fn is_cross_gcc(self, file_name: &str) -> bool {
        match self {
            Self::Posix => file_name.ends_with("-gcc"),
            Self::Windows => file_name.contains("eabi") && file_name.ends_with("-gcc.exe"),
        }
    }

    /// Strip the compiler executable name from a matched file name,
    /// keeping the joining dash: `arm-none-eabi-gcc` → `arm-none-eabi-`.
    pub(crate) fn strip_cross_gcc(self, file_name: &str) -> Option<&str> {
        match self {
            Self::Posix => file_name.strip_suffix("gcc"),
            Self::Windows => file_name.strip_suffix("gcc.exe"),
        }
    }

    /// Suffix appended to executable names on this platform.
    pub(crate) fn exe_suffix(self) -> &'static str {
        match self {
            Self::Posix => "",
            Self::Windows => ".exe",
        }
    }

    /// File name of the emitted top-level build script.
    pub fn build_script_name(self) -> &'static str {
        match self {
            Self::Posix => "BUILD",
            Self::Windows => "BUILD.BAT",
        }
    }

    /// File name of the emitted top-level clean script.
    pub fn clean_script_name(self) -> &'static str {
        match self {
            Self::Posix => "CLEAN",
            Self::Windows => "CLEAN.BAT",
        }
    }
}
