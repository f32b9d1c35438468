//! Class registry
//!
//! The registry plays the part of a class loader for signature resolution:
//! every class a signature can name must be registered here first.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::class::{ClassInfo, ClassRef};

/// Names registered by [`ClassRegistry::with_core_classes`]
const CORE_CLASSES: &[(&str, &[&str])] = &[
    ("java.lang.Object", &[]),
    ("java.lang.String", &[]),
    ("java.lang.Number", &[]),
    ("java.lang.Integer", &[]),
    ("java.lang.Class", &["T"]),
    ("java.lang.Enum", &["E"]),
];

/// Thread-safe table of registered classes, keyed by binary name
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: RwLock<FxHashMap<String, ClassRef>>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the `java.lang` classes class literals
    /// commonly refer to
    pub fn with_core_classes() -> Self {
        let registry = Self::new();
        for (name, params) in CORE_CLASSES {
            registry.register(ClassInfo::class(*name).with_type_params(params.iter().copied()));
        }
        registry.register(ClassInfo::interface("java.lang.annotation.Annotation"));
        registry
    }

    /// Register a class, replacing any previous class of the same name
    pub fn register(&self, info: ClassInfo) -> ClassRef {
        let class = ClassRef::new(info);
        debug!(class = class.name(), kind = ?class.kind, "registering class");
        self.classes
            .write()
            .insert(class.name().to_string(), class.clone());
        class
    }

    /// Look up a class by binary name
    pub fn lookup(&self, name: &str) -> Option<ClassRef> {
        self.classes.read().get(name).cloned()
    }

    /// Check if a class is registered
    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassKind;

    #[test]
    fn test_register_and_lookup() {
        let registry = ClassRegistry::new();
        assert!(registry.is_empty());

        let marker = registry.register(ClassInfo::annotation("pkg.Marker"));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("pkg.Marker"));
        assert!(registry.lookup("pkg.Marker").unwrap().ptr_eq(&marker));
        assert!(registry.lookup("pkg.Other").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let registry = ClassRegistry::new();
        registry.register(ClassInfo::class("pkg.Kind"));
        registry.register(ClassInfo::enumeration("pkg.Kind", ["A"]));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("pkg.Kind").unwrap().kind, ClassKind::Enum);
    }

    #[test]
    fn test_core_classes() {
        let registry = ClassRegistry::with_core_classes();
        assert!(registry.contains("java.lang.String"));
        assert!(registry
            .lookup("java.lang.Class")
            .unwrap()
            .declares_type_param("T"));
        assert_eq!(
            registry.lookup("java.lang.annotation.Annotation").unwrap().kind,
            ClassKind::Interface
        );
    }
}
