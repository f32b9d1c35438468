//! Class descriptions
//!
//! A [`ClassInfo`] carries only what annotation materialization needs to
//! know about a class: its kind, declared type parameters, enclosing class,
//! enum constants and annotation elements.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::value::RuntimeValue;
use crate::BaseType;

/// Kind of a registered class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Ordinary class
    Class,
    /// Interface
    Interface,
    /// Enum class
    Enum,
    /// Annotation interface
    Annotation,
}

/// Declared return type of an annotation element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// A primitive element
    Primitive(BaseType),
    /// `String`
    String,
    /// `Class<?>`
    Class,
    /// Enum of the named type
    Enum(String),
    /// Nested annotation of the named type
    Annotation(String),
    /// One-dimensional array of the component type
    Array(Box<ElementType>),
}

impl ElementType {
    /// Array of `component`
    pub fn array(component: ElementType) -> Self {
        ElementType::Array(Box::new(component))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Primitive(base) => write!(f, "{}", base),
            ElementType::String => f.write_str("java.lang.String"),
            ElementType::Class => f.write_str("java.lang.Class"),
            ElementType::Enum(name) | ElementType::Annotation(name) => f.write_str(name),
            ElementType::Array(component) => write!(f, "{}[]", component),
        }
    }
}

/// One element (method) declared by an annotation interface
#[derive(Debug, Clone, PartialEq)]
pub struct ElementInfo {
    /// Element name
    pub name: String,
    /// Declared return type
    pub return_type: ElementType,
    /// Default value, if the declaration has one
    pub default: Option<RuntimeValue>,
}

/// Reflection description of one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    /// Binary name (`pkg.Outer$Inner`)
    pub name: String,
    /// Class kind
    pub kind: ClassKind,
    /// Declared type parameter names, in order
    pub type_params: Vec<String>,
    /// Binary name of the lexically enclosing class
    pub enclosing: Option<String>,
    /// Enum constant names in ordinal order (enums only)
    pub enum_constants: Vec<String>,
    /// Declared elements in declaration order (annotations only)
    pub elements: Vec<ElementInfo>,
}

impl ClassInfo {
    fn with_kind(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            enclosing: None,
            enum_constants: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// An ordinary class
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Class)
    }

    /// An interface
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Interface)
    }

    /// An enum with the given constants
    pub fn enumeration<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut info = Self::with_kind(name, ClassKind::Enum);
        info.enum_constants = constants.into_iter().map(Into::into).collect();
        info
    }

    /// An annotation interface with no elements yet
    pub fn annotation(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Annotation)
    }

    /// Declare type parameters
    pub fn with_type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Set the enclosing class
    pub fn enclosed_by(mut self, outer: impl Into<String>) -> Self {
        self.enclosing = Some(outer.into());
        self
    }

    /// Declare an annotation element without a default
    pub fn element(mut self, name: impl Into<String>, return_type: ElementType) -> Self {
        self.elements.push(ElementInfo {
            name: name.into(),
            return_type,
            default: None,
        });
        self
    }

    /// Declare an annotation element with a default value
    pub fn element_with_default(
        mut self,
        name: impl Into<String>,
        return_type: ElementType,
        default: RuntimeValue,
    ) -> Self {
        self.elements.push(ElementInfo {
            name: name.into(),
            return_type,
            default: Some(default),
        });
        self
    }

    /// Look up a declared element
    pub fn get_element(&self, name: &str) -> Option<&ElementInfo> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Ordinal of an enum constant
    pub fn enum_ordinal(&self, constant: &str) -> Option<usize> {
        self.enum_constants.iter().position(|c| c == constant)
    }

    /// Whether the class declares type parameter `name`
    pub fn declares_type_param(&self, name: &str) -> bool {
        self.type_params.iter().any(|p| p == name)
    }

    /// Enum check
    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    /// Annotation interface check
    pub fn is_annotation(&self) -> bool {
        self.kind == ClassKind::Annotation
    }
}

/// Shared handle to a registered class
///
/// Two handles are equal when they name the same class.
#[derive(Clone)]
pub struct ClassRef(Arc<ClassInfo>);

impl ClassRef {
    /// Wrap a class description
    pub fn new(info: ClassInfo) -> Self {
        Self(Arc::new(info))
    }

    /// Binary name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// True when both handles point at the same registration
    pub fn ptr_eq(&self, other: &ClassRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ClassRef {
    type Target = ClassInfo;

    fn deref(&self) -> &ClassInfo {
        &self.0
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassRef({})", self.0.name)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_elements() {
        let info = ClassInfo::annotation("pkg.Sized")
            .element("value", ElementType::Primitive(BaseType::Int))
            .element_with_default("unit", ElementType::String, RuntimeValue::string("px"));

        assert!(info.is_annotation());
        assert_eq!(info.elements.len(), 2);
        assert!(info.get_element("value").unwrap().default.is_none());
        assert_eq!(
            info.get_element("unit").unwrap().default,
            Some(RuntimeValue::string("px"))
        );
        assert!(info.get_element("missing").is_none());
    }

    #[test]
    fn test_enum_ordinals() {
        let info = ClassInfo::enumeration("pkg.Kind", ["FAST", "SLOW"]);
        assert!(info.is_enum());
        assert_eq!(info.enum_ordinal("SLOW"), Some(1));
        assert_eq!(info.enum_ordinal("NOPE"), None);
    }

    #[test]
    fn test_class_ref_equality_by_name() {
        let a = ClassRef::new(ClassInfo::class("pkg.A"));
        let b = ClassRef::new(ClassInfo::class("pkg.A"));
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }

    #[test]
    fn test_element_type_display() {
        let ty = ElementType::array(ElementType::Enum("pkg.Kind".to_string()));
        assert_eq!(ty.to_string(), "pkg.Kind[]");
        assert_eq!(ElementType::Primitive(BaseType::Char).to_string(), "char");
    }
}
