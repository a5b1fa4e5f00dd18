//! Locations inside a configuration tree.
//!
//! Paths are rendered with dots between mapping keys and brackets around list
//! indices, so `kv_namespaces[2].id` names the `id` field of the third
//! `kv_namespaces` entry. The empty path renders as `<root>`.

use std::fmt;

/// One step from a parent node to a child node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    /// A mapping key.
    Key(String),
    /// A list position.
    Index(usize),
}

/// A dot/bracket path from the root of a tree.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TreePath {
    segments: Vec<PathSegment>,
}

impl TreePath {
    /// The path of the tree root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns a new path extended by a mapping key.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        self.child(PathSegment::Key(key.to_owned()))
    }

    /// Returns a new path extended by a list index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// The individual steps making up the path.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this is the root path.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
