use target_lexicon::{OperatingSystem, Triple};

/// The kind of operating system a build runs on
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
    Unknown
}

impl Platform {
    /// Maps a platform identifier (`win32`, `cygwin`, `darwin`, `linux`, ...) to a platform.
    /// Unrecognized identifiers map to [`Platform::Unknown`].
    pub fn from_identifier(identifier: &str) -> Platform {
        match identifier {
            "win32" | "cygwin" | "windows" => Platform::Windows,
            "darwin" | "macos" => Platform::Mac,
            "linux" => Platform::Linux,
            _ => Platform::Unknown
        }
    }

    pub fn from_os(os: &OperatingSystem) -> Platform {
        use OperatingSystem::*;

        match os {
            Windows => Platform::Windows,
            Darwin(_) | MacOSX(_) => Platform::Mac,
            Linux => Platform::Linux,
            _ => Platform::Unknown
        }
    }

    /// The platform of the host this program is running on
    pub fn host() -> Platform {
        Self::from_os(&Triple::host().operating_system)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Mac => "mac",
            Platform::Linux => "linux",
            Platform::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn identifiers() {
        assert_eq!(Platform::from_identifier("win32"), Platform::Windows);
        assert_eq!(Platform::from_identifier("cygwin"), Platform::Windows);
        assert_eq!(Platform::from_identifier("darwin"), Platform::Mac);
        assert_eq!(Platform::from_identifier("linux"), Platform::Linux);
        assert_eq!(Platform::from_identifier("freebsd13"), Platform::Unknown);
        assert_eq!(Platform::from_identifier(""), Platform::Unknown);
    }

    #[test]
    fn labels() {
        for id in ["win32", "darwin", "linux", "aix", "emscripten", "LINUX"] {
            let label = Platform::from_identifier(id).to_string();
            assert!(["windows", "mac", "linux", "unknown"].contains(&label.as_str()), "{label}");
        }
        assert_eq!(Platform::from_identifier("sunos5").to_string(), "unknown");
    }

    #[test]
    fn triples() {
        let os = |triple: &str| Triple::from_str(triple).unwrap().operating_system;
        assert_eq!(Platform::from_os(&os("x86_64-pc-windows-msvc")), Platform::Windows);
        assert_eq!(Platform::from_os(&os("aarch64-apple-darwin")), Platform::Mac);
        assert_eq!(Platform::from_os(&os("x86_64-unknown-linux-gnu")), Platform::Linux);
        assert_eq!(Platform::from_os(&os("wasm32-unknown-emscripten")), Platform::Unknown);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn host() {
        assert_eq!(Platform::host(), Platform::Linux);
    }
}
