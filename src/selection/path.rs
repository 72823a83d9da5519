use crate::error::{InvalidPathError, InvalidPathReason};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

/// An absolute directory path usable as a selection key.
///
/// * Comparison, ordering and hashing use the lowercased component list, so
///   `/Data/Photos` and `/data/photos/` are the same key.
/// * The original spelling (minus `.` segments and trailing separators) is kept
///   for display.
/// * Ordering is lexicographic over components, so every descendant of a path
///   sorts directly after it and before its next sibling.
#[derive(Debug, Clone)]
pub struct DirPath {
    path: PathBuf,
    key: Vec<String>,
}

impl DirPath {
    pub fn parse(path: impl AsRef<Path>) -> Result<Self, InvalidPathError> {
        let raw = path.as_ref();
        if raw.as_os_str().is_empty() {
            return Err(InvalidPathError::new(raw, InvalidPathReason::Empty));
        }
        if !raw.is_absolute() {
            return Err(InvalidPathError::new(raw, InvalidPathReason::Relative));
        }

        let mut normalized = PathBuf::new();
        let mut key = Vec::new();
        for component in raw.components() {
            match component {
                Component::Prefix(_) | Component::Normal(_) => {
                    let text = component.as_os_str().to_str().ok_or_else(|| {
                        InvalidPathError::new(raw, InvalidPathReason::NotUnicode)
                    })?;
                    key.push(text.to_lowercase());
                    normalized.push(component.as_os_str());
                }
                Component::RootDir => normalized.push(component.as_os_str()),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(InvalidPathError::new(raw, InvalidPathReason::ParentSegment));
                }
            }
        }

        Ok(Self {
            path: normalized,
            key,
        })
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.path.clone()
    }

    /// Number of named segments below the filesystem root.
    pub fn depth(&self) -> usize {
        self.key.len()
    }

    /// Last segment as spelled by the caller, or the whole path for a root.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn parent(&self) -> Option<DirPath> {
        let parent = self.path.parent()?;
        Some(Self {
            path: parent.to_path_buf(),
            key: self.key[..self.key.len().saturating_sub(1)].to_vec(),
        })
    }

    /// Segment-boundary prefix test: `/foo` covers `/foo/bar` but not `/foo2`.
    pub fn is_ancestor_or_equal(&self, other: &DirPath) -> bool {
        other.key.starts_with(&self.key)
    }

    /// Keys of this path and all its ancestors, shortest first.
    pub(crate) fn key_prefixes(&self) -> impl Iterator<Item = &[String]> {
        (0..=self.key.len()).map(move |n| &self.key[..n])
    }
}

impl PartialEq for DirPath {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for DirPath {}

impl Hash for DirPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.as_slice().hash(state);
    }
}

impl PartialOrd for DirPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DirPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Borrow<[String]> for DirPath {
    fn borrow(&self) -> &[String] {
        &self.key
    }
}

impl fmt::Display for DirPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    const ROOT: &str = "/";
    #[cfg(windows)]
    const ROOT: &str = r"C:\";

    fn dir(rel: &str) -> DirPath {
        DirPath::parse(Path::new(ROOT).join(rel)).unwrap()
    }

    #[test]
    fn test_rejects_empty_path() {
        let err = DirPath::parse("").unwrap_err();
        assert_eq!(err.reason, InvalidPathReason::Empty);
    }

    #[test]
    fn test_rejects_relative_path() {
        let err = DirPath::parse("photos/2024").unwrap_err();
        assert_eq!(err.reason, InvalidPathReason::Relative);
    }

    #[test]
    fn test_rejects_parent_segment() {
        let err = DirPath::parse(Path::new(ROOT).join("a").join("..").join("b")).unwrap_err();
        assert_eq!(err.reason, InvalidPathReason::ParentSegment);
    }

    #[test]
    fn test_case_and_trailing_separator_are_ignored() {
        let plain = dir("Data/Photos");
        let noisy_path = format!("{}/", Path::new(ROOT).join("data/./photos").display());
        let noisy = DirPath::parse(noisy_path).unwrap();
        assert_eq!(plain, noisy);
        assert_eq!(plain.depth(), 2);
    }

    #[test]
    fn test_display_keeps_original_casing() {
        assert_eq!(dir("Data/Photos").name(), "Photos");
    }

    #[test]
    fn test_ancestor_test_respects_segment_boundaries() {
        let foo = dir("Foo");
        assert!(foo.is_ancestor_or_equal(&dir("foo")));
        assert!(foo.is_ancestor_or_equal(&dir("Foo/bar/baz")));
        assert!(!foo.is_ancestor_or_equal(&dir("Foo2")));
        assert!(!dir("Foo/bar").is_ancestor_or_equal(&foo));
    }

    #[test]
    fn test_root_is_ancestor_of_everything() {
        let root = DirPath::parse(ROOT).unwrap();
        assert!(root.is_ancestor_or_equal(&dir("a/b/c")));
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_parent_drops_last_segment() {
        assert_eq!(dir("a/b").parent(), Some(dir("A")));
    }

    #[test]
    fn test_descendants_sort_before_next_sibling() {
        let mut paths = vec![dir("foo2"), dir("foo/z"), dir("foo"), dir("foo/a/b")];
        paths.sort();
        assert_eq!(
            paths,
            vec![dir("foo"), dir("foo/a/b"), dir("foo/z"), dir("foo2")]
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                .. ProptestConfig::default()
            })]

            /// PROPERTY: parsing never panics on arbitrary input.
            #[test]
            fn property_parse_never_panics(s in "(?s).{0,256}") {
                let _ = DirPath::parse(&s);
            }

            /// PROPERTY: an accepted path covers itself and is covered by each of its ancestors.
            #[test]
            fn property_parsed_path_is_covered_by_ancestors(s in "[A-Za-z0-9./_-]{0,64}") {
                if let Ok(parsed) = DirPath::parse(Path::new(ROOT).join(&s)) {
                    prop_assert!(parsed.is_ancestor_or_equal(&parsed));
                    let mut current = parsed.parent();
                    while let Some(ancestor) = current {
                        prop_assert!(ancestor.is_ancestor_or_equal(&parsed));
                        prop_assert!(!parsed.is_ancestor_or_equal(&ancestor));
                        current = ancestor.parent();
                    }
                }
            }
        }
    }
}
