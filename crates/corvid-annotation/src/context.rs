//! Collaborator contracts and the materialization context

use corvid_reflect::{Annotation, AttributeMismatch, ClassRef, ReflectType, ResolveError, RuntimeValue};
use indexmap::IndexMap;

use crate::config::MaterializeConfig;
use crate::error::MaterializeError;

/// Resolves signature text to a runtime type on behalf of a scope class
pub trait SignatureResolver: Send + Sync {
    /// Resolve `signature` with `scope` establishing type-variable and
    /// visibility context
    fn resolve_signature(&self, signature: &str, scope: &ClassRef)
        -> Result<ReflectType, ResolveError>;
}

/// Builds a live annotation from a resolved type and its element values
pub trait InstanceConstructor: Send + Sync {
    /// Fill defaults, type-check every value and construct the instance
    fn build_instance(
        &self,
        annotation_type: &ClassRef,
        values: IndexMap<String, RuntimeValue>,
    ) -> Result<Annotation, AttributeMismatch>;
}

/// Everything a materialization call needs, passed unchanged through the
/// whole recursion
#[derive(Clone, Copy)]
pub struct MaterializeContext<'a> {
    scope: &'a ClassRef,
    resolver: &'a dyn SignatureResolver,
    constructor: &'a dyn InstanceConstructor,
    config: &'a MaterializeConfig,
}

impl<'a> MaterializeContext<'a> {
    /// Create a context resolving on behalf of `scope`
    pub fn new(
        scope: &'a ClassRef,
        resolver: &'a dyn SignatureResolver,
        constructor: &'a dyn InstanceConstructor,
        config: &'a MaterializeConfig,
    ) -> Self {
        Self {
            scope,
            resolver,
            constructor,
            config,
        }
    }

    /// The class on whose behalf signatures are resolved
    pub fn scope(&self) -> &'a ClassRef {
        self.scope
    }

    /// Active limits
    pub fn config(&self) -> &'a MaterializeConfig {
        self.config
    }

    pub(crate) fn resolve(&self, signature: &str) -> Result<ReflectType, MaterializeError> {
        Ok(self.resolver.resolve_signature(signature, self.scope)?)
    }

    pub(crate) fn construct(
        &self,
        annotation_type: &ClassRef,
        values: IndexMap<String, RuntimeValue>,
    ) -> Result<Annotation, MaterializeError> {
        Ok(self.constructor.build_instance(annotation_type, values)?)
    }

    /// Depth for one more level of nesting, or an error past the limit
    pub(crate) fn descend(&self, depth: usize) -> Result<usize, MaterializeError> {
        let next = depth + 1;
        if next > self.config.max_depth {
            return Err(MaterializeError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }
        Ok(next)
    }
}
