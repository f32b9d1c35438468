//! Annotation instance construction
//!
//! [`annotation_for_map`] turns a resolved annotation type and a map of
//! element values into a live [`Annotation`]. It is the only place where
//! element values are checked against the declared element types.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::class::{ClassRef, ElementType};
use crate::value::{Annotation, AnnotationInstance, RuntimeValue};

/// Rejections raised while building an annotation instance
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttributeMismatch {
    /// The target type is not an annotation interface
    #[error("{0} is not an annotation type")]
    NotAnAnnotationType(String),

    /// A value was supplied for an element the type does not declare
    #[error("Annotation {annotation} has no element named {element}")]
    UnknownElement {
        /// Annotation type name
        annotation: String,
        /// Supplied element name
        element: String,
    },

    /// A value does not conform to the element's declared type
    #[error("Element {annotation}.{element} expects {expected}, found {found}")]
    TypeMismatch {
        /// Annotation type name
        annotation: String,
        /// Element name
        element: String,
        /// Declared type
        expected: String,
        /// Supplied value's type
        found: String,
    },

    /// A required element has neither a value nor a default
    #[error("Annotation {annotation} is missing element {element}")]
    MissingElement {
        /// Annotation type name
        annotation: String,
        /// Element name
        element: String,
    },
}

/// Build a live annotation of `annotation_type` from `values`
///
/// Unknown names are rejected first, in map order. Declared elements are
/// then visited in declaration order: supplied values are type-checked,
/// absent ones take the declared default. The instance lists its elements
/// in declaration order.
pub fn annotation_for_map(
    annotation_type: &ClassRef,
    mut values: IndexMap<String, RuntimeValue>,
) -> Result<Annotation, AttributeMismatch> {
    if !annotation_type.is_annotation() {
        return Err(AttributeMismatch::NotAnAnnotationType(
            annotation_type.name().to_string(),
        ));
    }

    if let Some(unknown) = values
        .keys()
        .find(|name| annotation_type.get_element(name).is_none())
    {
        return Err(AttributeMismatch::UnknownElement {
            annotation: annotation_type.name().to_string(),
            element: unknown.clone(),
        });
    }

    let mut members = IndexMap::with_capacity(annotation_type.elements.len());
    for element in &annotation_type.elements {
        let value = match values.shift_remove(&element.name) {
            Some(value) => value,
            None => match &element.default {
                Some(default) => default.clone(),
                None => {
                    return Err(AttributeMismatch::MissingElement {
                        annotation: annotation_type.name().to_string(),
                        element: element.name.clone(),
                    })
                }
            },
        };

        if !conforms(&value, &element.return_type) {
            return Err(AttributeMismatch::TypeMismatch {
                annotation: annotation_type.name().to_string(),
                element: element.name.clone(),
                expected: element.return_type.to_string(),
                found: value.describe(),
            });
        }
        members.insert(element.name.clone(), value);
    }

    debug!(
        annotation = annotation_type.name(),
        elements = members.len(),
        "constructed annotation instance"
    );
    Ok(Arc::new(AnnotationInstance::new(
        annotation_type.clone(),
        members,
    )))
}

fn conforms(value: &RuntimeValue, expected: &ElementType) -> bool {
    use crate::BaseType;

    match (expected, value) {
        (ElementType::Primitive(base), value) => matches!(
            (base, value),
            (BaseType::Byte, RuntimeValue::Byte(_))
                | (BaseType::Short, RuntimeValue::Short(_))
                | (BaseType::Int, RuntimeValue::Int(_))
                | (BaseType::Long, RuntimeValue::Long(_))
                | (BaseType::Float, RuntimeValue::Float(_))
                | (BaseType::Double, RuntimeValue::Double(_))
                | (BaseType::Boolean, RuntimeValue::Boolean(_))
                | (BaseType::Char, RuntimeValue::Char(_))
        ),
        (ElementType::String, RuntimeValue::String(_)) => true,
        (ElementType::Class, RuntimeValue::Class(_)) => true,
        (ElementType::Enum(name), RuntimeValue::Enum(e)) => e.enum_type.name() == name,
        (ElementType::Annotation(name), RuntimeValue::Annotation(a)) => {
            a.annotation_type().name() == name
        }
        (ElementType::Array(component), RuntimeValue::Array(elements)) => {
            elements.iter().all(|e| conforms(e, component))
        }
        _ => false,
    }
}
