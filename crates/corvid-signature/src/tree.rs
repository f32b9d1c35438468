//! Signature tree definitions

use std::fmt;

/// Primitive (base) types of the class-file type grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `D`
    Double,
    /// `F`
    Float,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `S`
    Short,
    /// `Z`
    Boolean,
}

impl BaseType {
    /// Map a descriptor character to its base type
    pub fn from_descriptor(ch: char) -> Option<Self> {
        match ch {
            'B' => Some(BaseType::Byte),
            'C' => Some(BaseType::Char),
            'D' => Some(BaseType::Double),
            'F' => Some(BaseType::Float),
            'I' => Some(BaseType::Int),
            'J' => Some(BaseType::Long),
            'S' => Some(BaseType::Short),
            'Z' => Some(BaseType::Boolean),
            _ => None,
        }
    }

    /// Descriptor character for this base type
    pub fn descriptor(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }

    /// Source-level keyword (`int`, `boolean`, ...)
    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed type signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// Primitive type
    Base(BaseType),
    /// `V`, only legal as a return type or class literal
    Void,
    /// `L...;`
    Class(ClassTypeSignature),
    /// `[T`
    Array(Box<TypeSignature>),
    /// `TName;`
    TypeVariable(String),
}

impl TypeSignature {
    /// Number of array dimensions wrapped around the innermost component
    pub fn dimensions(&self) -> usize {
        let mut dims = 0;
        let mut current = self;
        while let TypeSignature::Array(component) = current {
            dims += 1;
            current = &**component;
        }
        dims
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Base(base) => write!(f, "{}", base.descriptor()),
            TypeSignature::Void => f.write_str("V"),
            TypeSignature::Class(class) => write!(f, "{}", class),
            TypeSignature::Array(component) => write!(f, "[{}", component),
            TypeSignature::TypeVariable(name) => write!(f, "T{};", name),
        }
    }
}

/// One `Name<Args>` segment of a class type signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleClassTypeSignature {
    /// Segment name; the first segment keeps its slash-separated package path
    pub name: String,
    /// Type arguments, empty for raw or non-generic segments
    pub type_arguments: Vec<TypeArgument>,
}

impl SimpleClassTypeSignature {
    /// Segment without type arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }
}

/// `L pkg/Outer<A> . Inner<B> ;`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassTypeSignature {
    /// Outermost segment first
    pub path: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// Binary name of the innermost class (`pkg.Outer$Inner`)
    pub fn binary_name(&self) -> String {
        self.segment_binary_names().pop().unwrap_or_default()
    }

    /// Binary name of every segment's class, outermost first
    ///
    /// `Lpkg/Map.Entry;` gives `["pkg.Map", "pkg.Map$Entry"]`.
    pub fn segment_binary_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.path.len());
        let mut name = String::new();
        for (i, segment) in self.path.iter().enumerate() {
            if i == 0 {
                name.push_str(&segment.name.replace('/', "."));
            } else {
                name.push('$');
                name.push_str(&segment.name);
            }
            names.push(name.clone());
        }
        names
    }

    /// True when any segment carries type arguments
    pub fn is_parameterized(&self) -> bool {
        self.path.iter().any(|s| !s.type_arguments.is_empty())
    }
}

impl fmt::Display for ClassTypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("L")?;
        for (i, segment) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name)?;
            if !segment.type_arguments.is_empty() {
                f.write_str("<")?;
                for arg in &segment.type_arguments {
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")?;
            }
        }
        f.write_str(";")
    }
}

/// A type argument inside `<...>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArgument {
    /// `*`
    Unbounded,
    /// Plain reference type argument
    Exact(TypeSignature),
    /// `+T`
    Extends(TypeSignature),
    /// `-T`
    Super(TypeSignature),
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Unbounded => f.write_str("*"),
            TypeArgument::Exact(sig) => write!(f, "{}", sig),
            TypeArgument::Extends(sig) => write!(f, "+{}", sig),
            TypeArgument::Super(sig) => write!(f, "-{}", sig),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_type_descriptor_mapping() {
        for ch in ['B', 'C', 'D', 'F', 'I', 'J', 'S', 'Z'] {
            let base = BaseType::from_descriptor(ch).unwrap();
            assert_eq!(base.descriptor(), ch);
        }
        assert_eq!(BaseType::from_descriptor('V'), None);
        assert_eq!(BaseType::Long.to_string(), "long");
    }

    #[test]
    fn test_binary_name_for_inner_class() {
        let sig = ClassTypeSignature {
            path: vec![
                SimpleClassTypeSignature::new("pkg/sub/Outer"),
                SimpleClassTypeSignature::new("Inner"),
            ],
        };
        assert_eq!(sig.binary_name(), "pkg.sub.Outer$Inner");
        assert!(!sig.is_parameterized());
    }

    #[test]
    fn test_segment_binary_names() {
        let sig = ClassTypeSignature {
            path: vec![
                SimpleClassTypeSignature::new("java/util/Map"),
                SimpleClassTypeSignature::new("Entry"),
            ],
        };
        assert_eq!(
            sig.segment_binary_names(),
            vec!["java.util.Map".to_string(), "java.util.Map$Entry".to_string()]
        );
    }

    #[test]
    fn test_dimensions() {
        let sig = TypeSignature::Array(Box::new(TypeSignature::Array(Box::new(
            TypeSignature::Base(BaseType::Int),
        ))));
        assert_eq!(sig.dimensions(), 2);
        assert_eq!(sig.to_string(), "[[I");
    }
}
