//! Descriptor builder
//!
//! Directives are checked as they are added. Strict builders also validate
//! every module, package and class name; lenient builders accept names as
//! given, which is what the VM does for descriptors it generates itself.

use std::collections::BTreeSet;

use corvid_annotation::AnnotationNode;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, trace};

use crate::descriptor::{ModuleDescriptor, ModuleModifier};
use crate::directive::{
    Exports, ExportsModifier, Opens, OpensModifier, Provides, Requires, RequiresModifier, Uses,
};
use crate::names::{is_package_name, is_qualified_name, package_of};

/// Errors that can occur while building a descriptor
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuilderError {
    /// A name fails strict validation
    #[error("{name:?} is not a valid {kind} name")]
    InvalidName {
        /// What the name denotes (`module`, `package`, `service`, ...)
        kind: &'static str,
        /// The rejected name
        name: String,
    },

    /// Module already required
    #[error("Dependence upon {0} already declared")]
    DuplicateRequires(String),

    /// Package already exported
    #[error("Exported package {0} already declared")]
    DuplicateExports(String),

    /// Package already opened
    #[error("Opened package {0} already declared")]
    DuplicateOpens(String),

    /// Service already used
    #[error("Dependence upon service {0} already declared")]
    DuplicateUses(String),

    /// Service already provided
    #[error("Providers of service {0} already declared")]
    DuplicateProvides(String),

    /// `provides` with no provider classes
    #[error("Empty providers set for service {0}")]
    EmptyProviders(String),

    /// A module cannot require itself
    #[error("Dependence on self {0}")]
    SelfRequires(String),
}

/// Assembles a [`ModuleDescriptor`] directive by directive
#[derive(Debug, Clone)]
pub struct ModuleDescriptorBuilder {
    name: String,
    strict: bool,
    modifiers: BTreeSet<ModuleModifier>,
    version: Option<String>,
    main_class: Option<String>,
    requires: Vec<Requires>,
    exports: Vec<Exports>,
    opens: Vec<Opens>,
    uses: Vec<Uses>,
    provides: Vec<Provides>,
    packages: BTreeSet<String>,
    // Names already declared, per directive kind
    required: FxHashSet<String>,
    exported: FxHashSet<String>,
    opened: FxHashSet<String>,
    used: FxHashSet<String>,
    provided: FxHashSet<String>,
}

impl ModuleDescriptorBuilder {
    /// Start a descriptor for module `name`
    pub fn new<I>(name: impl Into<String>, strict: bool, modifiers: I) -> Result<Self, BuilderError>
    where
        I: IntoIterator<Item = ModuleModifier>,
    {
        let name = name.into();
        let builder = Self {
            name: String::new(),
            strict,
            modifiers: modifiers.into_iter().collect(),
            version: None,
            main_class: None,
            requires: Vec::new(),
            exports: Vec::new(),
            opens: Vec::new(),
            uses: Vec::new(),
            provides: Vec::new(),
            packages: BTreeSet::new(),
            required: FxHashSet::default(),
            exported: FxHashSet::default(),
            opened: FxHashSet::default(),
            used: FxHashSet::default(),
            provided: FxHashSet::default(),
        };
        builder.check("module", &name)?;
        Ok(Self { name, ..builder })
    }

    /// Name of the module being built
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether names are validated
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn check(&self, kind: &'static str, name: &str) -> Result<(), BuilderError> {
        let valid = match kind {
            "package" => is_package_name(name),
            _ => is_qualified_name(name),
        };
        if self.strict && !valid {
            return Err(BuilderError::InvalidName {
                kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Add a `requires` directive
    pub fn requires<M>(
        &mut self,
        modifiers: M,
        name: impl Into<String>,
        raw_compiled_version: Option<String>,
        annotations: Vec<AnnotationNode>,
    ) -> Result<&mut Self, BuilderError>
    where
        M: IntoIterator<Item = RequiresModifier>,
    {
        let name = name.into();
        self.check("module", &name)?;
        if name == self.name {
            return Err(BuilderError::SelfRequires(name));
        }
        if !self.required.insert(name.clone()) {
            return Err(BuilderError::DuplicateRequires(name));
        }
        trace!(module = self.name.as_str(), requires = name.as_str(), "adding requires");
        self.requires.push(Requires {
            modifiers: modifiers.into_iter().collect(),
            name,
            raw_compiled_version,
            annotations,
        });
        Ok(self)
    }

    /// Add an `exports` directive; an empty target set means unqualified
    pub fn exports<M, T>(
        &mut self,
        modifiers: M,
        source: impl Into<String>,
        targets: T,
        annotations: Vec<AnnotationNode>,
    ) -> Result<&mut Self, BuilderError>
    where
        M: IntoIterator<Item = ExportsModifier>,
        T: IntoIterator<Item = String>,
    {
        let source = source.into();
        self.check("package", &source)?;
        let targets = self.check_targets(targets)?;
        if !self.exported.insert(source.clone()) {
            return Err(BuilderError::DuplicateExports(source));
        }
        trace!(module = self.name.as_str(), exports = source.as_str(), "adding exports");
        self.packages.insert(source.clone());
        self.exports.push(Exports {
            modifiers: modifiers.into_iter().collect(),
            source,
            targets,
            annotations,
        });
        Ok(self)
    }

    /// Add an `opens` directive; an empty target set means unqualified
    pub fn opens<M, T>(
        &mut self,
        modifiers: M,
        source: impl Into<String>,
        targets: T,
        annotations: Vec<AnnotationNode>,
    ) -> Result<&mut Self, BuilderError>
    where
        M: IntoIterator<Item = OpensModifier>,
        T: IntoIterator<Item = String>,
    {
        let source = source.into();
        self.check("package", &source)?;
        let targets = self.check_targets(targets)?;
        if !self.opened.insert(source.clone()) {
            return Err(BuilderError::DuplicateOpens(source));
        }
        trace!(module = self.name.as_str(), opens = source.as_str(), "adding opens");
        self.packages.insert(source.clone());
        self.opens.push(Opens {
            modifiers: modifiers.into_iter().collect(),
            source,
            targets,
            annotations,
        });
        Ok(self)
    }

    fn check_targets<T>(&self, targets: T) -> Result<BTreeSet<String>, BuilderError>
    where
        T: IntoIterator<Item = String>,
    {
        targets
            .into_iter()
            .map(|target| {
                self.check("module", &target)?;
                Ok(target)
            })
            .collect()
    }

    /// Add a `uses` directive
    pub fn uses(
        &mut self,
        service: impl Into<String>,
        annotations: Vec<AnnotationNode>,
    ) -> Result<&mut Self, BuilderError> {
        let service = service.into();
        self.check("service", &service)?;
        if !self.used.insert(service.clone()) {
            return Err(BuilderError::DuplicateUses(service));
        }
        trace!(module = self.name.as_str(), uses = service.as_str(), "adding uses");
        self.uses.push(Uses {
            service,
            annotations,
        });
        Ok(self)
    }

    /// Add a `provides` directive
    ///
    /// Provider packages join the module's package set.
    pub fn provides(
        &mut self,
        service: impl Into<String>,
        providers: Vec<String>,
        annotations: Vec<AnnotationNode>,
    ) -> Result<&mut Self, BuilderError> {
        let service = service.into();
        self.check("service", &service)?;
        if providers.is_empty() {
            return Err(BuilderError::EmptyProviders(service));
        }
        for provider in &providers {
            self.check("provider", provider)?;
        }
        if !self.provided.insert(service.clone()) {
            return Err(BuilderError::DuplicateProvides(service));
        }
        trace!(
            module = self.name.as_str(),
            provides = service.as_str(),
            providers = providers.len(),
            "adding provides"
        );
        for provider in &providers {
            if let Some(package) = package_of(provider) {
                self.packages.insert(package.to_string());
            }
        }
        self.provides.push(Provides {
            service,
            providers,
            annotations,
        });
        Ok(self)
    }

    /// Add packages
    pub fn packages<I, S>(&mut self, packages: I) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for package in packages {
            let package = package.into();
            self.check("package", &package)?;
            self.packages.insert(package);
        }
        Ok(self)
    }

    /// Snapshot of the packages declared so far
    pub fn package_set(&self) -> &BTreeSet<String> {
        &self.packages
    }

    /// Set the raw version string
    pub fn version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = Some(version.into());
        self
    }

    /// Set the entry point class; its package joins the package set
    pub fn main_class(&mut self, class_name: impl Into<String>) -> Result<&mut Self, BuilderError> {
        let class_name = class_name.into();
        self.check("class", &class_name)?;
        if let Some(package) = package_of(&class_name) {
            self.packages.insert(package.to_string());
        }
        self.main_class = Some(class_name);
        Ok(self)
    }

    /// Finish the descriptor
    pub fn build(self) -> ModuleDescriptor {
        debug!(
            module = self.name.as_str(),
            requires = self.requires.len(),
            exports = self.exports.len(),
            opens = self.opens.len(),
            uses = self.uses.len(),
            provides = self.provides.len(),
            packages = self.packages.len(),
            "built module descriptor"
        );
        ModuleDescriptor {
            name: self.name,
            modifiers: self.modifiers,
            version: self.version,
            main_class: self.main_class,
            requires: self.requires,
            exports: self.exports,
            opens: self.opens,
            uses: self.uses,
            provides: self.provides,
            packages: self.packages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(name: &str) -> ModuleDescriptorBuilder {
        ModuleDescriptorBuilder::new(name, true, []).unwrap()
    }

    #[test]
    fn test_strict_module_name() {
        assert_eq!(
            ModuleDescriptorBuilder::new("bad-name", true, []).unwrap_err(),
            BuilderError::InvalidName {
                kind: "module",
                name: "bad-name".to_string(),
            }
        );
        let lenient = ModuleDescriptorBuilder::new("bad-name", false, []).unwrap();
        assert_eq!(lenient.name(), "bad-name");
        assert!(!lenient.is_strict());
    }

    #[test]
    fn test_duplicate_requires() {
        let mut builder = strict("app");
        builder.requires([], "java.sql", None, Vec::new()).unwrap();
        assert_eq!(
            builder
                .requires([RequiresModifier::Static], "java.sql", None, Vec::new())
                .unwrap_err(),
            BuilderError::DuplicateRequires("java.sql".to_string())
        );
    }

    #[test]
    fn test_self_requires() {
        let mut builder = strict("app");
        assert_eq!(
            builder.requires([], "app", None, Vec::new()).unwrap_err(),
            BuilderError::SelfRequires("app".to_string())
        );
    }

    #[test]
    fn test_exports_and_opens_are_tracked_separately() {
        let mut builder = strict("app");
        builder
            .exports([], "app.api", Vec::new(), Vec::new())
            .unwrap()
            .opens([], "app.api", Vec::new(), Vec::new())
            .unwrap();
        assert_eq!(
            builder
                .exports([ExportsModifier::Synthetic], "app.api", Vec::new(), Vec::new())
                .unwrap_err(),
            BuilderError::DuplicateExports("app.api".to_string())
        );
        assert_eq!(
            builder.opens([], "app.api", Vec::new(), Vec::new()).unwrap_err(),
            BuilderError::DuplicateOpens("app.api".to_string())
        );
        assert_eq!(builder.package_set().len(), 1);
    }

    #[test]
    fn test_invalid_target() {
        let mut builder = strict("app");
        assert_eq!(
            builder
                .exports([], "app.api", vec!["not valid".to_string()], Vec::new())
                .unwrap_err(),
            BuilderError::InvalidName {
                kind: "module",
                name: "not valid".to_string(),
            }
        );
        assert!(builder.package_set().is_empty());
    }

    #[test]
    fn test_provides_checks() {
        let mut builder = strict("app");
        assert_eq!(
            builder
                .provides("app.spi.Codec", Vec::new(), Vec::new())
                .unwrap_err(),
            BuilderError::EmptyProviders("app.spi.Codec".to_string())
        );
        builder
            .provides("app.spi.Codec", vec!["app.impl.Gzip".to_string()], Vec::new())
            .unwrap();
        assert_eq!(
            builder
                .provides("app.spi.Codec", vec!["app.impl.Zstd".to_string()], Vec::new())
                .unwrap_err(),
            BuilderError::DuplicateProvides("app.spi.Codec".to_string())
        );
        assert!(builder.package_set().contains("app.impl"));
    }

    #[test]
    fn test_duplicate_uses() {
        let mut builder = strict("app");
        builder.uses("app.spi.Codec", Vec::new()).unwrap();
        assert_eq!(
            builder.uses("app.spi.Codec", Vec::new()).unwrap_err(),
            BuilderError::DuplicateUses("app.spi.Codec".to_string())
        );
    }

    #[test]
    fn test_lenient_accepts_any_names() {
        let mut builder = ModuleDescriptorBuilder::new("gen", false, [ModuleModifier::Synthetic])
            .unwrap();
        builder
            .requires([], "x-y", None, Vec::new())
            .unwrap()
            .exports([], "1bad", Vec::new(), Vec::new())
            .unwrap()
            .packages(["class"])
            .unwrap();
        let descriptor = builder.build();
        assert_eq!(descriptor.requires()[0].name(), "x-y");
        assert!(descriptor.packages().contains("class"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BuilderError::InvalidName {
                kind: "package",
                name: "a..b".to_string(),
            }
            .to_string(),
            "\"a..b\" is not a valid package name"
        );
        assert_eq!(
            BuilderError::SelfRequires("app".to_string()).to_string(),
            "Dependence on self app"
        );
    }
}
