//! Error types and node paths.

use std::fmt;

/// One step from a node to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    /// A single-valued field, e.g. `value`.
    Field(&'static str),
    /// An element of a list-valued field, e.g. `body[2]`.
    Index(&'static str, usize),
}

impl From<&'static str> for PathSegment {
    fn from(field: &'static str) -> Self {
        PathSegment::Field(field)
    }
}

impl From<(&'static str, usize)> for PathSegment {
    fn from((field, index): (&'static str, usize)) -> Self {
        PathSegment::Index(field, index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(field) => f.write_str(field),
            PathSegment::Index(field, index) => write!(f, "{field}[{index}]"),
        }
    }
}

/// Position of a node within the tree being translated, as the chain of
/// fields leading to it from the translation root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Error that can occur while emitting target source.
///
/// Translation fails as a whole: no partial text is returned for a tree
/// containing a failing node.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodegenError {
    #[error("unsupported construct `{kind}` at {path}: {reason}")]
    UnsupportedConstruct {
        kind: String,
        reason: String,
        path: NodePath,
    },

    #[error("malformed `{kind}` node at {path}: {reason}")]
    MalformedNode {
        kind: String,
        reason: String,
        path: NodePath,
    },

    #[error("nesting depth exceeded limit of {limit} at {path}")]
    DepthExceeded { limit: usize, path: NodePath },
}

impl CodegenError {
    /// Kind of the offending node, if the error is tied to one.
    pub fn kind(&self) -> Option<&str> {
        match self {
            CodegenError::UnsupportedConstruct { kind, .. }
            | CodegenError::MalformedNode { kind, .. } => Some(kind),
            CodegenError::DepthExceeded { .. } => None,
        }
    }

    pub fn path(&self) -> &NodePath {
        match self {
            CodegenError::UnsupportedConstruct { path, .. }
            | CodegenError::MalformedNode { path, .. }
            | CodegenError::DepthExceeded { path, .. } => path,
        }
    }
}

/// Error that can occur when decoding a tree from its interchange form.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("invalid tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error("integer literal {0} does not fit in 64 bits")]
    IntegerOutOfRange(String),
}
