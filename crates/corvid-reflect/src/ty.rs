//! Reified runtime types

use std::fmt;

use crate::class::ClassRef;
use crate::BaseType;

/// A type produced by reifying a signature against a class scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReflectType {
    /// Primitive type
    Primitive(BaseType),
    /// `void`
    Void,
    /// Raw or non-generic class
    Class(ClassRef),
    /// Array of the component type
    Array(Box<ReflectType>),
    /// Generic class applied to type arguments
    Parameterized {
        /// The generic class
        raw: ClassRef,
        /// Type arguments in declaration order
        arguments: Vec<ReflectType>,
        /// Enclosing type for inner classes
        owner: Option<Box<ReflectType>>,
    },
    /// Type variable bound in a class scope
    TypeVariable {
        /// Variable name
        name: String,
        /// Class that declares the variable
        declaring: ClassRef,
    },
    /// `?`, `? extends T`, `? super T`; empty bounds mean unbounded
    Wildcard {
        /// Upper bounds
        upper: Vec<ReflectType>,
        /// Lower bounds
        lower: Vec<ReflectType>,
    },
}

impl ReflectType {
    /// The class, when this is a plain class type
    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            ReflectType::Class(class) => Some(class),
            _ => None,
        }
    }

    /// The raw class behind a class or parameterized type
    pub fn raw_class(&self) -> Option<&ClassRef> {
        match self {
            ReflectType::Class(class) => Some(class),
            ReflectType::Parameterized { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Type name as it would appear in source
    pub fn type_name(&self) -> String {
        self.to_string()
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[ReflectType], sep: &str) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

impl fmt::Display for ReflectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectType::Primitive(base) => write!(f, "{}", base),
            ReflectType::Void => f.write_str("void"),
            ReflectType::Class(class) => f.write_str(class.name()),
            ReflectType::Array(component) => write!(f, "{}[]", component),
            ReflectType::Parameterized {
                raw,
                arguments,
                owner,
            } => {
                match owner {
                    Some(owner) => {
                        let simple = raw.name().rsplit('$').next().unwrap_or(raw.name());
                        write!(f, "{}${}", owner, simple)?;
                    }
                    None => f.write_str(raw.name())?,
                }
                if !arguments.is_empty() {
                    f.write_str("<")?;
                    write_list(f, arguments, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            ReflectType::TypeVariable { name, .. } => f.write_str(name),
            ReflectType::Wildcard { upper, lower } => {
                f.write_str("?")?;
                if !lower.is_empty() {
                    f.write_str(" super ")?;
                    write_list(f, lower, " & ")
                } else if !upper.is_empty() {
                    f.write_str(" extends ")?;
                    write_list(f, upper, " & ")
                } else {
                    Ok(())
                }
            }
        }
    }
}
