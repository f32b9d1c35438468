//! Module descriptors

use std::collections::BTreeSet;

use corvid_annotation::{AnnotationNode, MaterializeContext, MaterializeError};
use corvid_reflect::Annotation;

use crate::directive::{Annotated, Exports, Opens, Provides, Requires, Uses};

/// Modifiers of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleModifier {
    /// Every package is open for deep reflection
    Open,
    /// Created from a plain archive rather than a declaration
    Automatic,
    /// Not present in the source
    Synthetic,
    /// Implicitly declared
    Mandated,
}

/// A named module and its directives
///
/// Built with [`ModuleDescriptorBuilder`](crate::ModuleDescriptorBuilder).
/// Directives keep the order in which they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDescriptor {
    pub(crate) name: String,
    pub(crate) modifiers: BTreeSet<ModuleModifier>,
    pub(crate) version: Option<String>,
    pub(crate) main_class: Option<String>,
    pub(crate) requires: Vec<Requires>,
    pub(crate) exports: Vec<Exports>,
    pub(crate) opens: Vec<Opens>,
    pub(crate) uses: Vec<Uses>,
    pub(crate) provides: Vec<Provides>,
    pub(crate) packages: BTreeSet<String>,
}

impl ModuleDescriptor {
    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module modifiers
    pub fn modifiers(&self) -> &BTreeSet<ModuleModifier> {
        &self.modifiers
    }

    /// True for `open module`
    pub fn is_open(&self) -> bool {
        self.modifiers.contains(&ModuleModifier::Open)
    }

    /// True for automatic modules
    pub fn is_automatic(&self) -> bool {
        self.modifiers.contains(&ModuleModifier::Automatic)
    }

    /// Raw version string
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Entry point class
    pub fn main_class(&self) -> Option<&str> {
        self.main_class.as_deref()
    }

    /// `requires` directives
    pub fn requires(&self) -> &[Requires] {
        &self.requires
    }

    /// `exports` directives
    pub fn exports(&self) -> &[Exports] {
        &self.exports
    }

    /// `opens` directives
    pub fn opens(&self) -> &[Opens] {
        &self.opens
    }

    /// `uses` directives
    pub fn uses(&self) -> &[Uses] {
        &self.uses
    }

    /// `provides` directives
    pub fn provides(&self) -> &[Provides] {
        &self.provides
    }

    /// Every package in the module, including exported and opened ones
    pub fn packages(&self) -> &BTreeSet<String> {
        &self.packages
    }

    /// Find the `requires` directive for module `name`
    pub fn find_requires(&self, name: &str) -> Option<&Requires> {
        self.requires.iter().find(|r| r.name() == name)
    }

    /// Every directive's annotations, in directive order: requires, exports,
    /// opens, uses, provides
    pub fn directive_annotations(&self) -> impl Iterator<Item = &AnnotationNode> {
        let requires = self.requires.iter().flat_map(|d| d.annotations());
        let exports = self.exports.iter().flat_map(|d| d.annotations());
        let opens = self.opens.iter().flat_map(|d| d.annotations());
        let uses = self.uses.iter().flat_map(|d| d.annotations());
        let provides = self.provides.iter().flat_map(|d| d.annotations());
        requires.chain(exports).chain(opens).chain(uses).chain(provides)
    }

    /// Materialize every directive annotation under `cx`, stopping at the
    /// first failure
    pub fn materialize_directive_annotations(
        &self,
        cx: &MaterializeContext<'_>,
    ) -> Result<Vec<Annotation>, MaterializeError> {
        self.directive_annotations()
            .map(|node| node.materialize(cx))
            .collect()
    }
}
