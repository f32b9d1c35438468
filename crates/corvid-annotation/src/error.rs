//! Materialization errors

use corvid_reflect::{AttributeMismatch, ResolveError};
use thiserror::Error;

/// Errors surfaced by [`AnnotationNode::materialize`](crate::AnnotationNode::materialize)
/// and [`AttributeValue::materialize`](crate::AttributeValue::materialize)
///
/// Nothing is recovered locally: the first failure met in left-to-right
/// order is returned and no partial instance is built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MaterializeError {
    /// A signature is malformed or names a type that cannot be found
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The enum type has no constant with the requested name
    #[error("Enum constant {constant} not found in {enum_type}")]
    EnumConstantNotFound {
        /// Enum type name
        enum_type: String,
        /// Requested constant
        constant: String,
    },

    /// An enum constant's signature resolved to something other than an enum
    #[error("{found} is not an enum type")]
    NotAnEnum {
        /// The resolved type
        found: String,
    },

    /// An annotation signature resolved to something other than a class
    #[error("{found} is not an annotation type")]
    NotAnAnnotation {
        /// The resolved type
        found: String,
    },

    /// The instance constructor rejected the assembled element map
    #[error(transparent)]
    Attribute(#[from] AttributeMismatch),

    /// Nested annotations and arrays go deeper than the configured limit
    #[error("Annotation nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded {
        /// Configured limit
        limit: usize,
    },
}
