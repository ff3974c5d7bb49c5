//! Path type for slash-delimited key-value store keys.

use std::fmt;

/// Errors related to path parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A path component contains characters a store key cannot carry.
    #[error("invalid path component '{component}' at position {position}: {message}")]
    InvalidComponent {
        component: String,
        position: usize,
        message: String,
    },
}

/// The separator between path components in every flat key.
pub const SEPARATOR: char = '/';

/// A validated path into a hierarchical key-value store.
///
/// Components are arbitrary non-empty strings without `/` or ASCII control
/// characters. Unlike file-system paths there is no `.`/`..` handling: store
/// keys are opaque segments and numeric components are ordinary names until
/// the unflattening engine decides otherwise.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    pub components: Vec<String>,
}

impl Path {
    /// Parse a path string, validating components.
    ///
    /// # Path Syntax
    ///
    /// - Components are separated by `/`
    /// - Empty components are ignored (normalizes `//`, leading and trailing `/`)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structkv_core::Path;
    ///
    /// let path = Path::parse("nestedmap/key4/key41").unwrap();
    /// assert_eq!(path.len(), 3);
    ///
    /// // Folder-style keys normalize to the folder itself
    /// assert_eq!(Path::parse("test/").unwrap(), Path::parse("test").unwrap());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let components: Vec<String> = s
            .split(SEPARATOR)
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();

        for (i, component) in components.iter().enumerate() {
            Self::validate_component(component, i)?;
        }

        Ok(Path { components })
    }

    /// The empty (root) path.
    pub fn root() -> Self {
        Path::default()
    }

    /// Try to create a path from components, validating each.
    pub fn try_from_components(components: Vec<String>) -> Result<Self, PathError> {
        for (i, component) in components.iter().enumerate() {
            Self::validate_component(component, i)?;
        }
        Ok(Path { components })
    }

    fn validate_component(component: &str, position: usize) -> Result<(), PathError> {
        if component.is_empty() {
            return Err(PathError::InvalidComponent {
                component: component.to_string(),
                position,
                message: "empty component".to_string(),
            });
        }

        if component.contains(SEPARATOR) {
            return Err(PathError::InvalidComponent {
                component: component.to_string(),
                position,
                message: format!("component may not contain '{}'", SEPARATOR),
            });
        }

        if let Some(c) = component.chars().find(|c| c.is_ascii_control()) {
            return Err(PathError::InvalidComponent {
                component: component.escape_debug().to_string(),
                position,
                message: format!("invalid control character {:?}", c),
            });
        }

        Ok(())
    }

    /// Check if this path is empty (root path).
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Iterate over components.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.components.iter()
    }

    /// Join this path with another.
    #[must_use]
    pub fn join(&self, other: &Path) -> Path {
        let mut components = self.components.clone();
        components.extend(other.components.iter().cloned());
        Path { components }
    }

    /// Check if this path has the given prefix, component-wise.
    pub fn has_prefix(&self, prefix: &Path) -> bool {
        prefix.components.len() <= self.components.len()
            && prefix.components == self.components[..prefix.components.len()]
    }

    /// Strip a prefix from this path.
    ///
    /// Returns `None` if the prefix doesn't match.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Path) -> Option<Path> {
        if self.has_prefix(prefix) {
            Some(Path {
                components: self.components[prefix.components.len()..].to_vec(),
            })
        } else {
            None
        }
    }

    /// The flat key for a child of this path.
    pub fn child_key(&self, segment: &str) -> String {
        join_key(&self.to_string(), segment)
    }
}

/// Append `segment` to a flat key, omitting the separator under the root.
///
/// ```rust
/// use structkv_core::join_key;
///
/// assert_eq!(join_key("", "key1"), "key1");
/// assert_eq!(join_key("test/key4", "key41"), "test/key4/key41");
/// ```
pub fn join_key(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{}{}{}", base, SEPARATOR, segment)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

impl std::ops::Index<usize> for Path {
    type Output = String;

    fn index(&self, i: usize) -> &Self::Output {
        &self.components[i]
    }
}

/// Macro for creating paths from literals.
///
/// # Example
///
/// ```rust
/// use structkv_core::path;
///
/// let p = path!("nestedstructmap/Key4/Key43");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::Path::parse($s).expect("invalid path literal")
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_paths() {
        assert_eq!(Path::parse("").unwrap().len(), 0);
        assert_eq!(Path::parse("foo").unwrap().len(), 1);
        assert_eq!(Path::parse("foo/bar").unwrap().len(), 2);
        assert_eq!(Path::parse("foo/bar/baz").unwrap().len(), 3);
    }

    #[test]
    fn normalize_slashes() {
        assert_eq!(
            Path::parse("foo/bar/").unwrap(),
            Path::parse("foo/bar").unwrap()
        );
        assert_eq!(
            Path::parse("foo//bar").unwrap(),
            Path::parse("foo/bar").unwrap()
        );
        assert_eq!(
            Path::parse("/foo/bar").unwrap(),
            Path::parse("foo/bar").unwrap()
        );
    }

    #[test]
    fn store_style_components_allowed() {
        let p = Path::parse("my-service/v1.2/Key_3/0").unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(&p[0], "my-service");
        assert_eq!(&p[3], "0");
    }

    #[test]
    fn control_characters_rejected() {
        let err = Path::parse("foo/ba\nr").unwrap_err();
        assert!(err.to_string().contains("position 1"));
        assert!(Path::parse("foo\tbar").is_err());
    }

    #[test]
    fn try_from_components_rejects_separator() {
        let result = Path::try_from_components(vec!["a/b".to_string()]);
        assert!(result.unwrap_err().to_string().contains("may not contain"));
    }

    #[test]
    fn try_from_components_rejects_empty() {
        let result = Path::try_from_components(vec!["".to_string()]);
        assert!(result.unwrap_err().to_string().contains("empty component"));
    }

    #[test]
    fn has_prefix_works() {
        let p = path!("foo/bar/baz");
        assert!(p.has_prefix(&path!("")));
        assert!(p.has_prefix(&path!("foo")));
        assert!(p.has_prefix(&path!("foo/bar/baz")));
        assert!(!p.has_prefix(&path!("bar")));
        assert!(!p.has_prefix(&path!("foo/bar/baz/qux")));
    }

    #[test]
    fn prefix_is_component_wise() {
        // "test2/key" shares a string prefix with "test" but not a path prefix.
        assert!(!path!("test2/key").has_prefix(&path!("test")));
        assert_eq!(path!("test2/key").strip_prefix(&path!("test")), None);
    }

    #[test]
    fn strip_prefix_works() {
        let p = path!("foo/bar/baz");
        assert_eq!(p.strip_prefix(&path!("foo")), Some(path!("bar/baz")));
        assert_eq!(p.strip_prefix(&path!("foo/bar/baz")), Some(Path::root()));
        assert_eq!(p.strip_prefix(&path!("other")), None);
    }

    #[test]
    fn child_key_under_root_has_no_separator() {
        assert_eq!(Path::root().child_key("key1"), "key1");
        assert_eq!(path!("a/b").child_key("c"), "a/b/c");
    }

    #[test]
    fn display_joins_components() {
        assert_eq!(path!("/a//b/").to_string(), "a/b");
    }
}
