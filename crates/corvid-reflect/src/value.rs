//! Live annotation values

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::class::ClassRef;
use crate::ty::ReflectType;

/// A live annotation instance, shared by reference
pub type Annotation = Arc<AnnotationInstance>;

/// A resolved enum constant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Enum class
    pub enum_type: ClassRef,
    /// Constant name
    pub name: String,
    /// Declaration position of the constant
    pub ordinal: usize,
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.enum_type, self.name)
    }
}

/// Runtime value of an annotation element
#[derive(Debug, Clone)]
pub enum RuntimeValue {
    /// `byte`
    Byte(i8),
    /// `short`
    Short(i16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `boolean`
    Boolean(bool),
    /// `char`, a UTF-16 code unit
    Char(u16),
    /// `String`
    String(String),
    /// Class literal
    Class(ReflectType),
    /// Enum constant
    Enum(EnumValue),
    /// Nested annotation
    Annotation(Annotation),
    /// Array of element values
    Array(Vec<RuntimeValue>),
}

impl RuntimeValue {
    /// Convenience constructor for string values
    pub fn string(value: impl Into<String>) -> Self {
        RuntimeValue::String(value.into())
    }

    /// Short description of the value's runtime type, for diagnostics
    pub fn describe(&self) -> String {
        match self {
            RuntimeValue::Byte(_) => "byte".to_string(),
            RuntimeValue::Short(_) => "short".to_string(),
            RuntimeValue::Int(_) => "int".to_string(),
            RuntimeValue::Long(_) => "long".to_string(),
            RuntimeValue::Float(_) => "float".to_string(),
            RuntimeValue::Double(_) => "double".to_string(),
            RuntimeValue::Boolean(_) => "boolean".to_string(),
            RuntimeValue::Char(_) => "char".to_string(),
            RuntimeValue::String(_) => "java.lang.String".to_string(),
            RuntimeValue::Class(_) => "java.lang.Class".to_string(),
            RuntimeValue::Enum(e) => e.enum_type.name().to_string(),
            RuntimeValue::Annotation(a) => a.annotation_type().name().to_string(),
            RuntimeValue::Array(elements) => match elements.first() {
                Some(first) => format!("{}[]", first.describe()),
                None => "[]".to_string(),
            },
        }
    }

    /// `int` payload
    pub fn as_int(&self) -> Option<i32> {
        match self {
            RuntimeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RuntimeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Class literal payload
    pub fn as_class(&self) -> Option<&ReflectType> {
        match self {
            RuntimeValue::Class(ty) => Some(ty),
            _ => None,
        }
    }

    /// Enum payload
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            RuntimeValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Nested annotation payload
    pub fn as_annotation(&self) -> Option<&Annotation> {
        match self {
            RuntimeValue::Annotation(a) => Some(a),
            _ => None,
        }
    }

    /// Array payload
    pub fn as_array(&self) -> Option<&[RuntimeValue]> {
        match self {
            RuntimeValue::Array(elements) => Some(elements),
            _ => None,
        }
    }
}

// Floating point values compare by bit pattern so that equality stays
// reflexive for NaN, matching annotation equality semantics.
impl PartialEq for RuntimeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Class(a), Self::Class(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Annotation(a), Self::Annotation(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for RuntimeValue {}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeValue::Byte(v) => write!(f, "(byte){}", v),
            RuntimeValue::Short(v) => write!(f, "(short){}", v),
            RuntimeValue::Int(v) => write!(f, "{}", v),
            RuntimeValue::Long(v) => write!(f, "{}L", v),
            RuntimeValue::Float(v) => write!(f, "{}f", v),
            RuntimeValue::Double(v) => write!(f, "{}", v),
            RuntimeValue::Boolean(v) => write!(f, "{}", v),
            RuntimeValue::Char(v) => match char::from_u32(u32::from(*v)) {
                Some(ch) => write!(f, "'{}'", ch.escape_default()),
                None => write!(f, "'\\u{:04x}'", v),
            },
            RuntimeValue::String(s) => write!(f, "{:?}", s),
            RuntimeValue::Class(ty) => write!(f, "{}.class", ty),
            RuntimeValue::Enum(e) => write!(f, "{}", e),
            RuntimeValue::Annotation(a) => write!(f, "{}", a),
            RuntimeValue::Array(elements) => {
                f.write_str("{")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A materialized annotation: its type plus a complete element mapping
///
/// Equality compares the type and the element mapping; element order does
/// not take part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationInstance {
    annotation_type: ClassRef,
    values: IndexMap<String, RuntimeValue>,
}

impl AnnotationInstance {
    pub(crate) fn new(annotation_type: ClassRef, values: IndexMap<String, RuntimeValue>) -> Self {
        Self {
            annotation_type,
            values,
        }
    }

    /// The annotation interface this instance implements
    pub fn annotation_type(&self) -> &ClassRef {
        &self.annotation_type
    }

    /// Value of element `name`
    pub fn get(&self, name: &str) -> Option<&RuntimeValue> {
        self.values.get(name)
    }

    /// Element values in declaration order
    pub fn values(&self) -> impl Iterator<Item = (&str, &RuntimeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for marker annotations
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for AnnotationInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}(", self.annotation_type)?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str(")")
    }
}
