//! Corvid Module Descriptors
//!
//! A module descriptor names a module and lists its directives: `requires`,
//! `exports`, `opens`, `uses` and `provides`. Each directive may carry
//! annotations. These are read while the VM boots, so they are stored as
//! deferred [`AnnotationNode`](corvid_annotation::AnnotationNode) values and
//! only materialized when someone asks for them.
//!
//! Descriptors are assembled with [`ModuleDescriptorBuilder`], which rejects
//! duplicate directives and, in strict mode, malformed names.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod builder;
mod descriptor;
mod directive;
mod names;

pub use builder::{BuilderError, ModuleDescriptorBuilder};
pub use descriptor::{ModuleDescriptor, ModuleModifier};
pub use directive::{
    Annotated, Exports, ExportsModifier, Opens, OpensModifier, Provides, Requires,
    RequiresModifier, Uses,
};
pub use names::{is_package_name, is_qualified_name};
