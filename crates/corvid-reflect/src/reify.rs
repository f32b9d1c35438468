//! Signature reification
//!
//! Converts a parsed [`TypeSignature`] into a [`ReflectType`]. Class names
//! are looked up in a [`ClassRegistry`]; type variables are looked up in
//! the scope class first and then in its enclosing classes, innermost
//! first.

use corvid_signature::{
    parse_type_signature, ClassTypeSignature, SignatureError, TypeArgument, TypeSignature,
};
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::trace;

use crate::class::ClassRef;
use crate::registry::ClassRegistry;
use crate::ty::ReflectType;

/// Errors raised while resolving a signature to a type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Signature text is not well formed
    #[error("Malformed type signature '{text}': {source}")]
    Signature {
        /// The offending text
        text: String,
        /// Parser diagnostic
        #[source]
        source: SignatureError,
    },

    /// A referenced class is not registered
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// A type variable is not declared in the scope chain
    #[error("Type variable {name} is not in scope of {scope}")]
    TypeVariableNotFound {
        /// Variable name
        name: String,
        /// Scope class the lookup started from
        scope: String,
    },
}

/// Parse `text` and reify it under `scope`
pub fn resolve_signature(
    registry: &ClassRegistry,
    text: &str,
    scope: &ClassRef,
) -> Result<ReflectType, ResolveError> {
    let sig = parse_type_signature(text).map_err(|source| ResolveError::Signature {
        text: text.to_string(),
        source,
    })?;
    let ty = Reifier::new(registry, scope).reify(&sig)?;
    trace!(signature = text, scope = scope.name(), resolved = %ty, "resolved signature");
    Ok(ty)
}

/// Turns signature trees into runtime types for one scope
pub struct Reifier<'a> {
    registry: &'a ClassRegistry,
    scope: &'a ClassRef,
}

impl<'a> Reifier<'a> {
    /// Create a reifier resolving against `registry` under `scope`
    pub fn new(registry: &'a ClassRegistry, scope: &'a ClassRef) -> Self {
        Self { registry, scope }
    }

    /// Reify one signature
    pub fn reify(&self, sig: &TypeSignature) -> Result<ReflectType, ResolveError> {
        match sig {
            TypeSignature::Base(base) => Ok(ReflectType::Primitive(*base)),
            TypeSignature::Void => Ok(ReflectType::Void),
            TypeSignature::Array(_) => {
                let mut dimensions = 0;
                let mut component = sig;
                while let TypeSignature::Array(inner) = component {
                    dimensions += 1;
                    component = &**inner;
                }
                let mut ty = self.reify(component)?;
                for _ in 0..dimensions {
                    ty = ReflectType::Array(Box::new(ty));
                }
                Ok(ty)
            }
            TypeSignature::TypeVariable(name) => self.find_type_variable(name),
            TypeSignature::Class(class) => self.reify_class(class),
        }
    }

    fn lookup(&self, name: &str) -> Result<ClassRef, ResolveError> {
        self.registry
            .lookup(name)
            .ok_or_else(|| ResolveError::ClassNotFound(name.to_string()))
    }

    fn reify_class(&self, sig: &ClassTypeSignature) -> Result<ReflectType, ResolveError> {
        if !sig.is_parameterized() {
            return Ok(ReflectType::Class(self.lookup(&sig.binary_name())?));
        }

        // Walk outermost to innermost so each segment's owner is the type
        // built for the previous segment.
        let mut current: Option<ReflectType> = None;
        for (segment, name) in sig.path.iter().zip(sig.segment_binary_names()) {
            let raw = self.lookup(&name)?;
            let arguments = segment
                .type_arguments
                .iter()
                .map(|arg| self.reify_argument(arg))
                .collect::<Result<Vec<_>, _>>()?;

            current = Some(match current.take() {
                None if arguments.is_empty() => ReflectType::Class(raw),
                owner => ReflectType::Parameterized {
                    raw,
                    arguments,
                    owner: owner.map(Box::new),
                },
            });
        }

        current.ok_or_else(|| ResolveError::ClassNotFound(sig.binary_name()))
    }

    fn reify_argument(&self, arg: &TypeArgument) -> Result<ReflectType, ResolveError> {
        match arg {
            TypeArgument::Unbounded => Ok(ReflectType::Wildcard {
                upper: Vec::new(),
                lower: Vec::new(),
            }),
            TypeArgument::Exact(sig) => self.reify(sig),
            TypeArgument::Extends(sig) => Ok(ReflectType::Wildcard {
                upper: vec![self.reify(sig)?],
                lower: Vec::new(),
            }),
            TypeArgument::Super(sig) => Ok(ReflectType::Wildcard {
                upper: Vec::new(),
                lower: vec![self.reify(sig)?],
            }),
        }
    }

    fn find_type_variable(&self, name: &str) -> Result<ReflectType, ResolveError> {
        // Enclosing chains come from registered data and may loop.
        let mut visited = FxHashSet::default();
        let mut current = Some(self.scope.clone());
        while let Some(class) = current {
            if !visited.insert(class.name().to_string()) {
                break;
            }
            if class.declares_type_param(name) {
                return Ok(ReflectType::TypeVariable {
                    name: name.to_string(),
                    declaring: class,
                });
            }
            current = class
                .enclosing
                .as_deref()
                .and_then(|outer| self.registry.lookup(outer));
        }
        Err(ResolveError::TypeVariableNotFound {
            name: name.to_string(),
            scope: self.scope.name().to_string(),
        })
    }
}
