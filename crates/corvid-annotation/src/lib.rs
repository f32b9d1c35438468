//! Corvid Deferred Annotations
//!
//! Annotations on module directives are read from class files while the VM
//! is still bootstrapping, before the machinery that builds live annotation
//! instances exists. This crate keeps them as plain value trees and turns
//! them into live instances later, on request, for a given caller class.
//!
//! ## Two phases
//!
//! 1. **Assembly** (pure): a producer builds [`AnnotationNode`] and
//!    [`AttributeValue`] trees, either by hand or with [`decode_annotations`].
//!    Nothing is resolved and nothing can fail except optional array shape
//!    checks.
//! 2. **Materialization** (effectful): [`AnnotationNode::materialize`] walks
//!    the tree bottom-up with a [`MaterializeContext`], resolving signatures
//!    through a [`SignatureResolver`] and building instances through an
//!    [`InstanceConstructor`]. The caller class travels unchanged through
//!    the whole walk.
//!
//! Already-live annotations are wrapped with [`AnnotationNode::pre_resolved`]
//! and come back unchanged, so consumers never need to know where an
//! annotation came from.
//!
//! ## Usage
//!
//! ```ignore
//! let runtime = AnnotationRuntime::new(registry);
//! let node = AnnotationNode::descriptor(
//!     "Lpkg/Sized;",
//!     [("value", AttributeValue::int(42))],
//! );
//! let annotation = runtime.materialize(&node, &caller)?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod config;
mod context;
mod decode;
mod error;
mod node;
mod runtime;
mod value;

pub use config::{ConfigError, MaterializeConfig, DEFAULT_MAX_DEPTH};
pub use context::{InstanceConstructor, MaterializeContext, SignatureResolver};
pub use decode::{decode_annotation, decode_annotations, Constant, ConstantPool, DecodeError};
pub use error::MaterializeError;
pub use node::AnnotationNode;
pub use runtime::AnnotationRuntime;
pub use value::{ArrayShapeError, AttributeValue};
