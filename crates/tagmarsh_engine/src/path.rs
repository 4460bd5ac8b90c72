//! Envelope paths for error context, e.g. `$.value.causes[0]`.

use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
enum Segment {
    Field(Arc<str>),
    Index(usize),
}

#[derive(Debug)]
struct Node {
    parent: Path,
    segment: Segment,
}

/// A shared, append-only path from the envelope root.
///
/// Children share their parent's nodes, so extending a path is O(1).
#[derive(Clone, Debug, Default)]
pub(crate) struct Path(Option<Arc<Node>>);

impl Path {
    /// The envelope root, written `$`.
    pub(crate) fn root() -> Self {
        Self::default()
    }

    /// Extends the path with a record field.
    pub(crate) fn field(&self, name: impl Into<Arc<str>>) -> Self {
        self.child(Segment::Field(name.into()))
    }

    /// Extends the path with an array index.
    pub(crate) fn index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }

    fn child(&self, segment: Segment) -> Self {
        Self(Some(Arc::new(Node {
            parent: self.clone(),
            segment,
        })))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = Vec::new();
        let mut cursor = self.0.as_deref();
        while let Some(node) = cursor {
            segments.push(&node.segment);
            cursor = node.parent.0.as_deref();
        }
        write!(f, "$")?;
        for segment in segments.into_iter().rev() {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Drop for Path {
    // Unlink iteratively so long chains do not recurse on drop.
    fn drop(&mut self) {
        let mut next = self.0.take();
        while let Some(node) = next {
            next = match Arc::try_unwrap(node) {
                Ok(mut node) => node.parent.0.take(),
                Err(_) => None,
            };
        }
    }
}
