use std::path::Path;

/// Prefix windows puts in front of canonicalized paths, after slash conversion
const VERBATIM_PREFIX: &str = "//?/";

/// Formats a path using forward slashes only, regardless of the platform.
///
/// Windows verbatim prefixes (`\\?\`) are stripped.
pub fn forward_slashes(path: &Path) -> String {
    let str = path.to_string_lossy().replace("\\", "/");
    match str.strip_prefix(VERBATIM_PREFIX) {
        Some(stripped) => stripped.to_string(),
        None => str
    }
}

/// The last component of a slash or backslash separated path
pub fn bare_file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn converts_backslashes() {
        let path = PathBuf::from("C:\\projects\\hello\\main.cpp");
        assert_eq!(forward_slashes(&path), "C:/projects/hello/main.cpp");
    }

    #[test]
    fn strips_verbatim_prefix() {
        let path = PathBuf::from("\\\\?\\C:\\projects");
        assert_eq!(forward_slashes(&path), "C:/projects");
    }

    #[test]
    fn file_name() {
        assert_eq!(bare_file_name("some/dir/run.html"), "run.html");
        assert_eq!(bare_file_name("some\\dir\\run.html"), "run.html");
        assert_eq!(bare_file_name("run.html"), "run.html");
    }
}
