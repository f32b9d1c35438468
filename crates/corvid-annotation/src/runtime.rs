//! Default wiring over a class registry

use std::sync::Arc;

use corvid_reflect::{
    annotation_for_map, resolve_signature, Annotation, AttributeMismatch, ClassRef, ClassRegistry,
    ReflectType, ResolveError, RuntimeValue,
};
use indexmap::IndexMap;

use crate::config::MaterializeConfig;
use crate::context::{InstanceConstructor, MaterializeContext, SignatureResolver};
use crate::error::MaterializeError;
use crate::node::AnnotationNode;

/// Resolver and constructor backed by a shared [`ClassRegistry`]
#[derive(Debug, Clone)]
pub struct AnnotationRuntime {
    registry: Arc<ClassRegistry>,
    config: MaterializeConfig,
}

impl AnnotationRuntime {
    /// Create a runtime with default limits
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self {
            registry,
            config: MaterializeConfig::default(),
        }
    }

    /// Replace the limits
    pub fn with_config(mut self, config: MaterializeConfig) -> Self {
        self.config = config;
        self
    }

    /// The backing registry
    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// Active limits
    pub fn config(&self) -> &MaterializeConfig {
        &self.config
    }

    /// Context resolving on behalf of `caller`
    pub fn context<'a>(&'a self, caller: &'a ClassRef) -> MaterializeContext<'a> {
        MaterializeContext::new(caller, self, self, &self.config)
    }

    /// Materialize one node for `caller`
    pub fn materialize(
        &self,
        node: &AnnotationNode,
        caller: &ClassRef,
    ) -> Result<Annotation, MaterializeError> {
        node.materialize(&self.context(caller))
    }

    /// Materialize nodes in order, stopping at the first failure
    pub fn materialize_all(
        &self,
        nodes: &[AnnotationNode],
        caller: &ClassRef,
    ) -> Result<Vec<Annotation>, MaterializeError> {
        let cx = self.context(caller);
        nodes.iter().map(|node| node.materialize(&cx)).collect()
    }
}

impl SignatureResolver for AnnotationRuntime {
    fn resolve_signature(
        &self,
        signature: &str,
        scope: &ClassRef,
    ) -> Result<ReflectType, ResolveError> {
        resolve_signature(&self.registry, signature, scope)
    }
}

impl InstanceConstructor for AnnotationRuntime {
    fn build_instance(
        &self,
        annotation_type: &ClassRef,
        values: IndexMap<String, RuntimeValue>,
    ) -> Result<Annotation, AttributeMismatch> {
        annotation_for_map(annotation_type, values)
    }
}
