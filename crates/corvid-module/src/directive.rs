//! Module directives
//!
//! Every directive carries an ordered list of deferred annotations. The
//! directives hand them out as opaque [`AnnotationNode`] values and never
//! look inside them.

use std::collections::BTreeSet;
use std::fmt;

use corvid_annotation::{AnnotationNode, MaterializeContext, MaterializeError};
use corvid_reflect::Annotation;

/// Something that carries directive annotations
pub trait Annotated {
    /// The deferred annotations, in class-file order
    fn annotations(&self) -> &[AnnotationNode];

    /// Materialize every annotation under `cx`, stopping at the first failure
    fn materialize_annotations(
        &self,
        cx: &MaterializeContext<'_>,
    ) -> Result<Vec<Annotation>, MaterializeError> {
        self.annotations()
            .iter()
            .map(|node| node.materialize(cx))
            .collect()
    }
}

/// Modifiers of a `requires` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequiresModifier {
    /// Readability is passed on to modules that read this one
    Transitive,
    /// Needed at compile time only
    Static,
    /// Not present in the source
    Synthetic,
    /// Implicitly declared
    Mandated,
}

/// Modifiers of an `exports` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExportsModifier {
    /// Not present in the source
    Synthetic,
    /// Implicitly declared
    Mandated,
}

/// Modifiers of an `opens` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpensModifier {
    /// Not present in the source
    Synthetic,
    /// Implicitly declared
    Mandated,
}

impl fmt::Display for RequiresModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequiresModifier::Transitive => "transitive",
            RequiresModifier::Static => "static",
            RequiresModifier::Synthetic => "synthetic",
            RequiresModifier::Mandated => "mandated",
        })
    }
}

/// Dependence on another module
#[derive(Debug, Clone, PartialEq)]
pub struct Requires {
    pub(crate) modifiers: BTreeSet<RequiresModifier>,
    pub(crate) name: String,
    pub(crate) raw_compiled_version: Option<String>,
    pub(crate) annotations: Vec<AnnotationNode>,
}

impl Requires {
    /// Modifiers
    pub fn modifiers(&self) -> &BTreeSet<RequiresModifier> {
        &self.modifiers
    }

    /// Name of the required module
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version recorded at compile time, unparsed
    pub fn raw_compiled_version(&self) -> Option<&str> {
        self.raw_compiled_version.as_deref()
    }

    /// True for `requires transitive`
    pub fn is_transitive(&self) -> bool {
        self.modifiers.contains(&RequiresModifier::Transitive)
    }
}

impl fmt::Display for Requires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("requires ")?;
        for modifier in &self.modifiers {
            write!(f, "{} ", modifier)?;
        }
        f.write_str(&self.name)?;
        if let Some(version) = &self.raw_compiled_version {
            write!(f, " (@{})", version)?;
        }
        Ok(())
    }
}

/// A package made available to other modules at compile and run time
#[derive(Debug, Clone, PartialEq)]
pub struct Exports {
    pub(crate) modifiers: BTreeSet<ExportsModifier>,
    pub(crate) source: String,
    pub(crate) targets: BTreeSet<String>,
    pub(crate) annotations: Vec<AnnotationNode>,
}

impl Exports {
    /// Modifiers
    pub fn modifiers(&self) -> &BTreeSet<ExportsModifier> {
        &self.modifiers
    }

    /// Exported package
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Target modules; empty when unqualified
    pub fn targets(&self) -> &BTreeSet<String> {
        &self.targets
    }

    /// True when the export names target modules
    pub fn is_qualified(&self) -> bool {
        !self.targets.is_empty()
    }
}

/// A package opened for deep reflection
#[derive(Debug, Clone, PartialEq)]
pub struct Opens {
    pub(crate) modifiers: BTreeSet<OpensModifier>,
    pub(crate) source: String,
    pub(crate) targets: BTreeSet<String>,
    pub(crate) annotations: Vec<AnnotationNode>,
}

impl Opens {
    /// Modifiers
    pub fn modifiers(&self) -> &BTreeSet<OpensModifier> {
        &self.modifiers
    }

    /// Opened package
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Target modules; empty when unqualified
    pub fn targets(&self) -> &BTreeSet<String> {
        &self.targets
    }

    /// True when the package is opened to named modules only
    pub fn is_qualified(&self) -> bool {
        !self.targets.is_empty()
    }
}

/// A service the module consumes
#[derive(Debug, Clone, PartialEq)]
pub struct Uses {
    pub(crate) service: String,
    pub(crate) annotations: Vec<AnnotationNode>,
}

impl Uses {
    /// Service type name
    pub fn service(&self) -> &str {
        &self.service
    }
}

/// Implementations the module offers for a service
#[derive(Debug, Clone, PartialEq)]
pub struct Provides {
    pub(crate) service: String,
    pub(crate) providers: Vec<String>,
    pub(crate) annotations: Vec<AnnotationNode>,
}

impl Provides {
    /// Service type name
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Provider class names, in declaration order
    pub fn providers(&self) -> &[String] {
        &self.providers
    }
}

macro_rules! impl_annotated {
    ($($directive:ty),* $(,)?) => {
        $(
            impl Annotated for $directive {
                fn annotations(&self) -> &[AnnotationNode] {
                    &self.annotations
                }
            }
        )*
    };
}

impl_annotated!(Requires, Exports, Opens, Uses, Provides);
