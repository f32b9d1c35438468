//! Corvid Reflection Runtime
//!
//! The runtime side of the type system: registered classes, reified types,
//! and the live values an annotation element can hold.
//!
//! ## Components
//!
//! - [`ClassRegistry`]: thread-safe name -> class table, the lookup authority
//!   for signature resolution
//! - [`Reifier`]: turns a parsed signature into a [`ReflectType`] under a
//!   class scope
//! - [`annotation_for_map`]: builds a live [`Annotation`] from a resolved
//!   annotation type and an element value map

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod class;
mod factory;
mod registry;
mod reify;
mod ty;
mod value;

pub use class::{ClassInfo, ClassKind, ClassRef, ElementInfo, ElementType};
pub use factory::{annotation_for_map, AttributeMismatch};
pub use registry::ClassRegistry;
pub use reify::{resolve_signature, Reifier, ResolveError};
pub use ty::ReflectType;
pub use value::{Annotation, AnnotationInstance, EnumValue, RuntimeValue};

pub use corvid_signature::BaseType;
