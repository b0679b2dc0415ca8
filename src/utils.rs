// src/utils.rs
use sha2::{Digest, Sha256};
use std::path::Path;

/// Computes SHA256 hash of content with normalized line endings.
#[must_use]
pub fn compute_sha256(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Normalizes a path to use forward slashes (cross-platform prefix matching).
#[must_use]
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_ignores_line_endings() {
        assert_eq!(compute_sha256("a: 1\r\nb: 2\r\n"), compute_sha256("a: 1\nb: 2\n"));
        assert_ne!(compute_sha256("a: 1\n"), compute_sha256("a: 2\n"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("src/lib/a.c")), "src/lib/a.c");
    }
}
