use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of resolving an entry name under an extraction root.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: String,
    pub resolved: PathBuf,
}

/// Resolve a decoded entry name against `base`.
///
/// Names that are absolute, or whose `..` components climb out of
/// `base`, are rejected as zip-slip rather than rewritten.
pub fn sanitize_path<B: AsRef<Path>>(entry_name: &str, base: B) -> Result<SanitizedPath> {
    if entry_name.contains('\0') {
        return Err(Error::InvalidPath {
            entry: entry_name.to_owned(),
        });
    }

    let base = normalize_path(base.as_ref());
    let entry = Path::new(entry_name);
    if entry.has_root() || entry.is_absolute() {
        return Err(Error::ZipSlip {
            entry: entry_name.to_owned(),
            resolved: entry.to_path_buf(),
        });
    }

    let resolved = normalize_path(&base.join(entry));
    if !resolved.starts_with(&base) {
        return Err(Error::ZipSlip {
            entry: entry_name.to_owned(),
            resolved,
        });
    }

    Ok(SanitizedPath {
        original: entry_name.to_owned(),
        resolved,
    })
}

/// Lexically resolve `.` and `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(Component::RootDir.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_base_path() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/opt/out")
        } else {
            Path::new("/opt/out")
        }
    }

    #[test]
    fn basic_path_sanitization() {
        let result = sanitize_path("docs/readme.txt", test_base_path()).unwrap();
        assert_eq!(result.original, "docs/readme.txt");
        assert_eq!(
            result.resolved.strip_prefix(test_base_path()).unwrap(),
            Path::new("docs/readme.txt")
        );
    }

    #[test]
    fn inner_parent_components_are_resolved() {
        let result = sanitize_path("a/b/../c.txt", test_base_path()).unwrap();
        assert_eq!(result.resolved, test_base_path().join("a/c.txt"));
    }

    #[test]
    fn zip_slip_protection() {
        let escaping = sanitize_path("../../etc/passwd", test_base_path());
        assert!(matches!(escaping, Err(Error::ZipSlip { .. })));

        let malicious_path = if cfg!(windows) { "C:\\etc\\passwd" } else { "/etc/passwd" };
        let absolute = sanitize_path(malicious_path, test_base_path());
        assert!(matches!(absolute, Err(Error::ZipSlip { .. })));
    }

    #[test]
    fn name_resolving_to_base_stays_inside() {
        let result = sanitize_path("./", test_base_path()).unwrap();
        assert_eq!(result.resolved, test_base_path());
    }

    #[test]
    fn null_byte_rejected() {
        assert!(matches!(
            sanitize_path("a\0b", test_base_path()),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn path_normalization() {
        let result = normalize_path(Path::new("foo//bar/./baz/../qux"));
        assert_eq!(result, Path::new("foo/bar/qux"));
    }
}
