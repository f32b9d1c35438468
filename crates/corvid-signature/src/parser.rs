//! Type signature parser
//!
//! Recursive-descent parser for the JVMS 4.7.9.1 `JavaTypeSignature`
//! grammar, extended with `V` at the top level so class literals such as
//! `void.class` can be expressed.
//!
//! ```text
//! JavaTypeSignature      := BaseType | ReferenceTypeSignature
//! ReferenceTypeSignature := ClassTypeSignature | TypeVariableSignature | ArrayTypeSignature
//! ClassTypeSignature     := 'L' [pkg '/']* Simple ('.' Simple)* ';'
//! Simple                 := Identifier ['<' TypeArgument+ '>']
//! TypeArgument           := '*' | ['+' | '-'] ReferenceTypeSignature
//! TypeVariableSignature  := 'T' Identifier ';'
//! ArrayTypeSignature     := '[' JavaTypeSignature
//! ```

use thiserror::Error;

use crate::tree::{BaseType, ClassTypeSignature, SimpleClassTypeSignature, TypeArgument, TypeSignature};

/// Array dimension limit of a single array type (JVMS 4.3.2)
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Nesting limit for type argument lists
pub const MAX_TYPE_ARGUMENT_NESTING: usize = 64;

/// Errors produced while parsing a signature
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Input was empty
    #[error("Empty type signature")]
    Empty,

    /// Input ended in the middle of a production
    #[error("Unexpected end of signature at offset {offset}")]
    UnexpectedEnd {
        /// Byte offset where more input was expected
        offset: usize,
    },

    /// A character that cannot start or continue the current production
    #[error("Unexpected character '{found}' at offset {offset}, expected {expected}")]
    UnexpectedChar {
        /// Offending character
        found: char,
        /// Byte offset of the character
        offset: usize,
        /// What the parser was looking for
        expected: &'static str,
    },

    /// Identifier with no characters (`L;`, `T;`, `Lpkg/;`)
    #[error("Empty identifier at offset {offset}")]
    EmptyIdentifier {
        /// Byte offset where the identifier should start
        offset: usize,
    },

    /// `<>` with no arguments
    #[error("Empty type argument list at offset {offset}")]
    EmptyTypeArguments {
        /// Byte offset of the `<`
        offset: usize,
    },

    /// More than [`MAX_ARRAY_DIMENSIONS`] leading `[`
    #[error("Array type exceeds 255 dimensions at offset {offset}")]
    TooManyDimensions {
        /// Byte offset of the first excess `[`
        offset: usize,
    },

    /// Type argument lists nested deeper than [`MAX_TYPE_ARGUMENT_NESTING`]
    #[error("Type arguments nested deeper than 64 levels at offset {offset}")]
    NestingTooDeep {
        /// Byte offset of the offending `<`
        offset: usize,
    },

    /// A complete signature followed by more input
    #[error("Trailing input after signature at offset {offset}")]
    TrailingInput {
        /// Byte offset of the first unconsumed character
        offset: usize,
    },
}

/// Parse a complete type signature
pub fn parse_type_signature(text: &str) -> Result<TypeSignature, SignatureError> {
    SignatureParser::new(text).parse_type_sig()
}

/// Cursor-based signature parser
pub struct SignatureParser<'a> {
    source: &'a str,
    position: usize,
    depth: usize,
}

impl<'a> SignatureParser<'a> {
    /// Create a parser over `source`
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            depth: 0,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Parse the whole input as one type signature (or `V`)
    pub fn parse_type_sig(&mut self) -> Result<TypeSignature, SignatureError> {
        if self.source.is_empty() {
            return Err(SignatureError::Empty);
        }

        let sig = if self.peek() == Some('V') {
            self.bump();
            TypeSignature::Void
        } else {
            self.parse_java_type()?
        };

        if self.position < self.source.len() {
            return Err(SignatureError::TrailingInput {
                offset: self.position,
            });
        }
        Ok(sig)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn expect(&mut self, wanted: char, expected: &'static str) -> Result<(), SignatureError> {
        match self.bump() {
            Some(ch) if ch == wanted => Ok(()),
            Some(found) => Err(SignatureError::UnexpectedChar {
                found,
                offset: self.position - found.len_utf8(),
                expected,
            }),
            None => Err(SignatureError::UnexpectedEnd {
                offset: self.position,
            }),
        }
    }

    fn parse_java_type(&mut self) -> Result<TypeSignature, SignatureError> {
        let offset = self.position;
        match self.peek() {
            Some(ch) => match BaseType::from_descriptor(ch) {
                Some(base) => {
                    self.bump();
                    Ok(TypeSignature::Base(base))
                }
                None => self.parse_reference_type(),
            },
            None => Err(SignatureError::UnexpectedEnd { offset }),
        }
    }

    fn parse_reference_type(&mut self) -> Result<TypeSignature, SignatureError> {
        let offset = self.position;
        match self.peek() {
            Some('L') => Ok(TypeSignature::Class(self.parse_class_type()?)),
            Some('T') => {
                self.bump();
                let name = self.parse_identifier()?;
                self.expect(';', "';' after type variable")?;
                Ok(TypeSignature::TypeVariable(name))
            }
            Some('[') => {
                let mut dimensions = 0;
                while self.peek() == Some('[') {
                    if dimensions == MAX_ARRAY_DIMENSIONS {
                        return Err(SignatureError::TooManyDimensions {
                            offset: self.position,
                        });
                    }
                    self.bump();
                    dimensions += 1;
                }
                let mut sig = self.parse_java_type()?;
                for _ in 0..dimensions {
                    sig = TypeSignature::Array(Box::new(sig));
                }
                Ok(sig)
            }
            Some(found) => Err(SignatureError::UnexpectedChar {
                found,
                offset,
                expected: "type signature",
            }),
            None => Err(SignatureError::UnexpectedEnd { offset }),
        }
    }

    fn parse_class_type(&mut self) -> Result<ClassTypeSignature, SignatureError> {
        self.expect('L', "'L'")?;

        // Package path is folded into the first segment name.
        let mut first = self.parse_identifier()?;
        while self.peek() == Some('/') {
            self.bump();
            first.push('/');
            first.push_str(&self.parse_identifier()?);
        }

        let mut path = vec![SimpleClassTypeSignature {
            name: first,
            type_arguments: self.parse_type_arguments()?,
        }];

        loop {
            let offset = self.position;
            match self.bump() {
                Some(';') => break,
                Some('.') => {
                    let name = self.parse_identifier()?;
                    let type_arguments = self.parse_type_arguments()?;
                    path.push(SimpleClassTypeSignature {
                        name,
                        type_arguments,
                    });
                }
                Some(found) => {
                    return Err(SignatureError::UnexpectedChar {
                        found,
                        offset,
                        expected: "'.' or ';' in class type",
                    })
                }
                None => return Err(SignatureError::UnexpectedEnd { offset }),
            }
        }

        Ok(ClassTypeSignature { path })
    }

    fn parse_type_arguments(&mut self) -> Result<Vec<TypeArgument>, SignatureError> {
        if self.peek() != Some('<') {
            return Ok(Vec::new());
        }
        let open = self.position;
        if self.depth == MAX_TYPE_ARGUMENT_NESTING {
            return Err(SignatureError::NestingTooDeep { offset: open });
        }
        self.bump();

        self.depth += 1;
        let args = self.parse_argument_list(open);
        self.depth -= 1;
        args
    }

    fn parse_argument_list(&mut self, open: usize) -> Result<Vec<TypeArgument>, SignatureError> {
        let mut args = Vec::new();
        loop {
            match self.peek() {
                Some('>') => {
                    self.bump();
                    break;
                }
                Some('*') => {
                    self.bump();
                    args.push(TypeArgument::Unbounded);
                }
                Some('+') => {
                    self.bump();
                    args.push(TypeArgument::Extends(self.parse_reference_type()?));
                }
                Some('-') => {
                    self.bump();
                    args.push(TypeArgument::Super(self.parse_reference_type()?));
                }
                Some(_) => args.push(TypeArgument::Exact(self.parse_reference_type()?)),
                None => {
                    return Err(SignatureError::UnexpectedEnd {
                        offset: self.position,
                    })
                }
            }
        }

        if args.is_empty() {
            return Err(SignatureError::EmptyTypeArguments { offset: open });
        }
        Ok(args)
    }

    fn parse_identifier(&mut self) -> Result<String, SignatureError> {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if matches!(ch, '.' | ';' | '[' | '/' | '<' | '>' | ':') {
                break;
            }
            self.bump();
        }
        if self.position == start {
            return match self.peek() {
                Some(_) => Err(SignatureError::EmptyIdentifier { offset: start }),
                None => Err(SignatureError::UnexpectedEnd { offset: start }),
            };
        }
        Ok(self.source[start..self.position].to_string())
    }
}
