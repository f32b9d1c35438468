//! Attribute value trees
//!
//! [`AttributeValue`] covers every payload an annotation element can carry
//! in a class file. Primitive and string payloads are already final; class
//! literals and enum constants keep their type signature as text until
//! materialization.

use corvid_reflect::{EnumValue, ReflectType, RuntimeValue};
use corvid_signature::{parse_type_signature, TypeSignature};
use thiserror::Error;

use crate::context::MaterializeContext;
use crate::error::MaterializeError;
use crate::node::AnnotationNode;

/// Rejections from [`AttributeValue::try_array`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArrayShapeError {
    /// An element's shape differs from the first element's
    #[error("Array element {index} is {found}, expected {expected}")]
    Heterogeneous {
        /// Position of the offending element
        index: usize,
        /// Shape of element 0
        expected: String,
        /// Shape of the offending element
        found: String,
    },

    /// Arrays of arrays are not legal element values
    #[error("Array element {index} is itself an array")]
    NestedArray {
        /// Position of the offending element
        index: usize,
    },
}

/// One deferred annotation element value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// `byte` constant
    ByteConst(i8),
    /// `short` constant
    ShortConst(i16),
    /// `int` constant
    IntConst(i32),
    /// `long` constant
    LongConst(i64),
    /// `float` constant
    FloatConst(f32),
    /// `double` constant
    DoubleConst(f64),
    /// `boolean` constant
    BoolConst(bool),
    /// `char` constant (UTF-16 code unit)
    CharConst(u16),
    /// String literal
    StringLiteral(String),
    /// Class literal, kept as its type signature
    ClassLiteral(String),
    /// Enum constant: the enum's type signature and the constant name
    EnumConstant {
        /// Signature of the enum type (`Lpkg/Kind;`)
        type_signature: String,
        /// Constant name
        constant_name: String,
    },
    /// Nested annotation
    NestedAnnotation(AnnotationNode),
    /// Ordered array of values
    ArrayValue(Vec<AttributeValue>),
}

impl AttributeValue {
    /// `byte` constant
    pub fn byte(value: i8) -> Self {
        AttributeValue::ByteConst(value)
    }

    /// `short` constant
    pub fn short(value: i16) -> Self {
        AttributeValue::ShortConst(value)
    }

    /// `int` constant
    pub fn int(value: i32) -> Self {
        AttributeValue::IntConst(value)
    }

    /// `long` constant
    pub fn long(value: i64) -> Self {
        AttributeValue::LongConst(value)
    }

    /// `float` constant
    pub fn float(value: f32) -> Self {
        AttributeValue::FloatConst(value)
    }

    /// `double` constant
    pub fn double(value: f64) -> Self {
        AttributeValue::DoubleConst(value)
    }

    /// `boolean` constant
    pub fn boolean(value: bool) -> Self {
        AttributeValue::BoolConst(value)
    }

    /// `char` constant
    pub fn char(value: u16) -> Self {
        AttributeValue::CharConst(value)
    }

    /// String literal
    pub fn string(value: impl Into<String>) -> Self {
        AttributeValue::StringLiteral(value.into())
    }

    /// Class literal from a type signature (`Ljava/lang/String;`, `I`, `V`)
    pub fn class(type_signature: impl Into<String>) -> Self {
        AttributeValue::ClassLiteral(type_signature.into())
    }

    /// Enum constant
    pub fn enumeration(type_signature: impl Into<String>, constant_name: impl Into<String>) -> Self {
        AttributeValue::EnumConstant {
            type_signature: type_signature.into(),
            constant_name: constant_name.into(),
        }
    }

    /// Nested annotation
    pub fn annotation(node: AnnotationNode) -> Self {
        AttributeValue::NestedAnnotation(node)
    }

    /// Array without shape checks
    pub fn array(elements: Vec<AttributeValue>) -> Self {
        AttributeValue::ArrayValue(elements)
    }

    /// Array whose elements must all share one shape
    ///
    /// Elements must be the same variant; enum constants must name the same
    /// enum signature and nested annotations the same annotation type.
    /// Arrays of arrays are rejected.
    pub fn try_array(elements: Vec<AttributeValue>) -> Result<Self, ArrayShapeError> {
        let mut expected: Option<String> = None;
        for (index, element) in elements.iter().enumerate() {
            if matches!(element, AttributeValue::ArrayValue(_)) {
                return Err(ArrayShapeError::NestedArray { index });
            }
            let shape = element.shape();
            match &expected {
                None => expected = Some(shape),
                Some(first) if *first != shape => {
                    return Err(ArrayShapeError::Heterogeneous {
                        index,
                        expected: first.clone(),
                        found: shape,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(AttributeValue::ArrayValue(elements))
    }

    fn shape(&self) -> String {
        match self {
            AttributeValue::ByteConst(_) => "byte".to_string(),
            AttributeValue::ShortConst(_) => "short".to_string(),
            AttributeValue::IntConst(_) => "int".to_string(),
            AttributeValue::LongConst(_) => "long".to_string(),
            AttributeValue::FloatConst(_) => "float".to_string(),
            AttributeValue::DoubleConst(_) => "double".to_string(),
            AttributeValue::BoolConst(_) => "boolean".to_string(),
            AttributeValue::CharConst(_) => "char".to_string(),
            AttributeValue::StringLiteral(_) => "string".to_string(),
            AttributeValue::ClassLiteral(_) => "class".to_string(),
            AttributeValue::EnumConstant { type_signature, .. } => {
                format!("enum {}", binary_name_of(type_signature))
            }
            AttributeValue::NestedAnnotation(node) => format!("annotation {}", node.type_name()),
            AttributeValue::ArrayValue(_) => "array".to_string(),
        }
    }

    /// Materialize on behalf of the context's scope class
    pub fn materialize(&self, cx: &MaterializeContext<'_>) -> Result<RuntimeValue, MaterializeError> {
        self.materialize_at(cx, 0)
    }

    pub(crate) fn materialize_at(
        &self,
        cx: &MaterializeContext<'_>,
        depth: usize,
    ) -> Result<RuntimeValue, MaterializeError> {
        match self {
            AttributeValue::ByteConst(v) => Ok(RuntimeValue::Byte(*v)),
            AttributeValue::ShortConst(v) => Ok(RuntimeValue::Short(*v)),
            AttributeValue::IntConst(v) => Ok(RuntimeValue::Int(*v)),
            AttributeValue::LongConst(v) => Ok(RuntimeValue::Long(*v)),
            AttributeValue::FloatConst(v) => Ok(RuntimeValue::Float(*v)),
            AttributeValue::DoubleConst(v) => Ok(RuntimeValue::Double(*v)),
            AttributeValue::BoolConst(v) => Ok(RuntimeValue::Boolean(*v)),
            AttributeValue::CharConst(v) => Ok(RuntimeValue::Char(*v)),
            AttributeValue::StringLiteral(s) => Ok(RuntimeValue::String(s.clone())),
            AttributeValue::ClassLiteral(signature) => Ok(RuntimeValue::Class(cx.resolve(signature)?)),
            AttributeValue::EnumConstant {
                type_signature,
                constant_name,
            } => {
                let enum_type = match cx.resolve(type_signature)? {
                    ReflectType::Class(class) if class.is_enum() => class,
                    other => {
                        return Err(MaterializeError::NotAnEnum {
                            found: other.to_string(),
                        })
                    }
                };
                let ordinal = enum_type.enum_ordinal(constant_name).ok_or_else(|| {
                    MaterializeError::EnumConstantNotFound {
                        enum_type: enum_type.name().to_string(),
                        constant: constant_name.clone(),
                    }
                })?;
                Ok(RuntimeValue::Enum(EnumValue {
                    enum_type,
                    name: constant_name.clone(),
                    ordinal,
                }))
            }
            AttributeValue::NestedAnnotation(node) => {
                let depth = cx.descend(depth)?;
                Ok(RuntimeValue::Annotation(node.materialize_at(cx, depth)?))
            }
            AttributeValue::ArrayValue(elements) => {
                let depth = cx.descend(depth)?;
                elements
                    .iter()
                    .map(|element| element.materialize_at(cx, depth))
                    .collect::<Result<Vec<_>, _>>()
                    .map(RuntimeValue::Array)
            }
        }
    }
}

/// Binary name of a class type signature, so `Lpkg/Outer.Inner;` and
/// `Lpkg/Outer$Inner;` compare equal. Other text is returned unchanged.
pub(crate) fn binary_name_of(type_signature: &str) -> String {
    match parse_type_signature(type_signature) {
        Ok(TypeSignature::Class(class)) => class.binary_name(),
        _ => type_signature.to_string(),
    }
}
