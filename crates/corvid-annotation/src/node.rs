//! Annotation nodes

use std::sync::Arc;

use corvid_reflect::{Annotation, ReflectType};
use indexmap::IndexMap;
use tracing::debug;

use crate::context::MaterializeContext;
use crate::error::MaterializeError;
use crate::value::{binary_name_of, AttributeValue};

/// One annotation occurrence, either still deferred or already live
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationNode {
    /// Not yet materialized: a type signature plus element values
    Descriptor {
        /// Signature of the annotation type (`Lpkg/Marker;`)
        type_signature: String,
        /// Element values in class-file order
        attributes: IndexMap<String, AttributeValue>,
    },
    /// An annotation that was live before it was wrapped
    PreResolved(Annotation),
}

impl AnnotationNode {
    /// Deferred annotation from a signature and `(name, value)` pairs
    ///
    /// A repeated name keeps its first position and its last value.
    pub fn descriptor<I, K>(type_signature: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeValue)>,
        K: Into<String>,
    {
        AnnotationNode::Descriptor {
            type_signature: type_signature.into(),
            attributes: attributes
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// Wrap a live annotation
    pub fn pre_resolved(annotation: Annotation) -> Self {
        AnnotationNode::PreResolved(annotation)
    }

    /// Wrap every live annotation, keeping their order
    pub fn pre_resolved_all<I>(annotations: I) -> Vec<Self>
    where
        I: IntoIterator<Item = Annotation>,
    {
        annotations.into_iter().map(AnnotationNode::PreResolved).collect()
    }

    /// True once the node holds a live annotation
    pub fn is_pre_resolved(&self) -> bool {
        matches!(self, AnnotationNode::PreResolved(_))
    }

    /// Signature of a deferred node
    pub fn type_signature(&self) -> Option<&str> {
        match self {
            AnnotationNode::Descriptor { type_signature, .. } => Some(type_signature),
            AnnotationNode::PreResolved(_) => None,
        }
    }

    /// Element values of a deferred node
    pub fn attributes(&self) -> Option<&IndexMap<String, AttributeValue>> {
        match self {
            AnnotationNode::Descriptor { attributes, .. } => Some(attributes),
            AnnotationNode::PreResolved(_) => None,
        }
    }

    /// Binary name of the annotation type, for either variant
    pub(crate) fn type_name(&self) -> String {
        match self {
            AnnotationNode::Descriptor { type_signature, .. } => binary_name_of(type_signature),
            AnnotationNode::PreResolved(annotation) => annotation.annotation_type().name().to_string(),
        }
    }

    /// Produce the live annotation on behalf of the context's scope class
    ///
    /// Pre-resolved nodes return their instance as is. Deferred nodes
    /// resolve their type, materialize every attribute in order and hand
    /// the resulting map to the instance constructor. Each call builds a
    /// fresh instance; nothing is cached.
    pub fn materialize(&self, cx: &MaterializeContext<'_>) -> Result<Annotation, MaterializeError> {
        self.materialize_at(cx, 0)
    }

    pub(crate) fn materialize_at(
        &self,
        cx: &MaterializeContext<'_>,
        depth: usize,
    ) -> Result<Annotation, MaterializeError> {
        let (type_signature, attributes) = match self {
            AnnotationNode::PreResolved(annotation) => return Ok(Arc::clone(annotation)),
            AnnotationNode::Descriptor {
                type_signature,
                attributes,
            } => (type_signature, attributes),
        };

        debug!(
            signature = type_signature.as_str(),
            scope = cx.scope().name(),
            attributes = attributes.len(),
            depth,
            "materializing annotation"
        );

        let annotation_type = match cx.resolve(type_signature)? {
            ReflectType::Class(class) => class,
            other => {
                return Err(MaterializeError::NotAnAnnotation {
                    found: other.to_string(),
                })
            }
        };

        let mut values = IndexMap::with_capacity(attributes.len());
        for (name, value) in attributes {
            values.insert(name.clone(), value.materialize_at(cx, depth)?);
        }

        cx.construct(&annotation_type, values)
    }
}
