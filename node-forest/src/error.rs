//! Error types of the forest operations

use std::borrow::Cow;
use thiserror::Error;

/// Result type alias using the forest `Error`
pub type Result<T> = std::result::Result<T, Error>;

const DEFAULT_HIERARCHY_MESSAGE: &str = "a node was inserted somewhere it doesn't belong";

/// Errors returned by forest operations
///
/// No operation changes the forest before returning an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operation was given a node it cannot work on
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// A node was asked to move somewhere it cannot be
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

impl Error {
    /// Check if this is a structural error
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }

    /// Check if this is a hierarchy error
    pub fn is_hierarchy(&self) -> bool {
        matches!(self, Self::Hierarchy(_))
    }
}

/// The node handle is invalid for the requested operation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralError {
    /// The node has been released from its forest
    #[error("the node has been released")]
    Released,

    /// The node handle was created by another forest
    #[error("the node belongs to another forest")]
    ForeignForest,

    /// The node has no parent to be detached from
    #[error("the node has no parent")]
    NoParent,
}

/// A node would become a child of itself or of nothing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HierarchyError {
    message: Cow<'static, str>,
}

impl HierarchyError {
    /// Create an error with the default message
    pub fn new() -> Self {
        Self {
            message: Cow::Borrowed(DEFAULT_HIERARCHY_MESSAGE),
        }
    }

    /// Create an error with a custom message
    pub fn with_message(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for HierarchyError {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages() {
        let err: Error = HierarchyError::new().into();
        assert!(err.is_hierarchy());
        assert_eq!(
            err.to_string(),
            "a node was inserted somewhere it doesn't belong"
        );
        let err: Error = HierarchyError::with_message("no room for you").into();
        assert_eq!(err.to_string(), "no room for you");
        let err: Error = StructuralError::NoParent.into();
        assert!(err.is_structural());
        assert_eq!(err.to_string(), "the node has no parent");
    }
}
