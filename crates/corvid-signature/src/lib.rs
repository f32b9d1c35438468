//! Corvid Type Signatures
//!
//! Tree representation and parser for the textual type signatures found in
//! class files (`I`, `[Ljava/lang/String;`, `Ljava/util/List<TT;>;`, ...).
//!
//! The parser only builds a tree. Turning a tree into a runtime type is the
//! job of the reifier in `corvid-reflect`, which needs a class registry and
//! a resolution scope.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod parser;
pub mod tree;

pub use parser::{
    parse_type_signature, SignatureError, SignatureParser, MAX_ARRAY_DIMENSIONS,
    MAX_TYPE_ARGUMENT_NESTING,
};
pub use tree::{BaseType, ClassTypeSignature, SimpleClassTypeSignature, TypeArgument, TypeSignature};
