//! Structural position of a component within a pipeline config

use std::fmt;
use std::sync::Arc;

/// Path from the config root to a component, e.g.
/// `root.input.broker.inputs.0`.
///
/// Components without an explicit label are labelled with their path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ComponentPath {
    segments: Arc<[String]>,
}

impl ComponentPath {
    /// The config root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from root-relative segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Extend this path with more segments.
    pub fn join<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            self.segments
                .iter()
                .cloned()
                .chain(segments.into_iter().map(Into::into)),
        )
    }

    /// Root-relative segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for segment in self.segments.iter() {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}
