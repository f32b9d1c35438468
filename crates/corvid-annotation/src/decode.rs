//! Class-file annotation decoding
//!
//! Reads the `annotation` and `element_value` structures of JVMS 4.7.16
//! into deferred [`AnnotationNode`] trees. Decoding only needs the constant
//! pool; no type is resolved here.
//!
//! ## Element value tags
//!
//! | Tag | Payload                         | Value                |
//! |-----|---------------------------------|----------------------|
//! | `B` `C` `I` `S` `Z` | integer constant    | primitive constant   |
//! | `J` | long constant                   | `LongConst`          |
//! | `F` | float constant                  | `FloatConst`         |
//! | `D` | double constant                 | `DoubleConst`        |
//! | `s` | utf8                            | `StringLiteral`      |
//! | `e` | utf8 type, utf8 constant name   | `EnumConstant`       |
//! | `c` | utf8 return descriptor          | `ClassLiteral`       |
//! | `@` | nested annotation               | `NestedAnnotation`   |
//! | `[` | u2 count, element values        | `ArrayValue`         |

use indexmap::IndexMap;
use thiserror::Error;
use tracing::trace;

use crate::node::AnnotationNode;
use crate::value::{ArrayShapeError, AttributeValue};

/// Nesting bound for arrays and annotations inside one structure
const MAX_NESTING: usize = 256;

/// Slots addressable by a u2 pool index, slot 0 included
const MAX_POOL_SLOTS: usize = u16::MAX as usize;

/// Errors that can occur while decoding annotation bytes
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    /// Input ended early
    #[error("Unexpected end of annotation data at offset {0}")]
    UnexpectedEnd(usize),

    /// Constant pool index is missing or holds the wrong kind of constant
    #[error("Constant pool entry {index} is not a valid {expected} constant")]
    BadConstant {
        /// Pool index
        index: u16,
        /// Expected constant kind
        expected: &'static str,
    },

    /// Unknown element value tag
    #[error("Unknown element value tag {tag:#04x} at offset {offset}")]
    UnknownTag {
        /// Tag byte
        tag: u8,
        /// Offset of the tag
        offset: usize,
    },

    /// Array elements disagree in shape
    #[error("Malformed array at offset {offset}: {source}")]
    ArrayShape {
        /// Offset of the `[` tag
        offset: usize,
        /// Shape diagnostic
        #[source]
        source: ArrayShapeError,
    },

    /// Nesting deeper than the decoder accepts
    #[error("Annotation nesting too deep at offset {0}")]
    TooDeep(usize),

    /// Bytes left over after the last structure
    #[error("Trailing bytes after annotation data at offset {0}")]
    TrailingBytes(usize),
}

/// A loadable constant referenced by annotation data
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// `CONSTANT_Utf8`
    Utf8(String),
    /// `CONSTANT_Integer`
    Integer(i32),
    /// `CONSTANT_Float`
    Float(f32),
    /// `CONSTANT_Long` (occupies two slots)
    Long(i64),
    /// `CONSTANT_Double` (occupies two slots)
    Double(f64),
}

/// Constant pool with class-file numbering: index 0 is unused and long or
/// double constants take two slots
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPool {
    entries: Vec<Option<Constant>>,
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            entries: vec![None],
        }
    }

    /// Append a constant and return its index
    ///
    /// Returns `None` once the constant no longer fits below index 65535;
    /// the pool is left unchanged.
    pub fn push(&mut self, constant: Constant) -> Option<u16> {
        let wide = matches!(constant, Constant::Long(_) | Constant::Double(_));
        let slots = if wide { 2 } else { 1 };
        if self.entries.len() + slots > MAX_POOL_SLOTS {
            return None;
        }
        let index = u16::try_from(self.entries.len()).ok()?;
        self.entries.push(Some(constant));
        if wide {
            self.entries.push(None);
        }
        Some(index)
    }

    /// Append a utf8 constant
    pub fn add_utf8(&mut self, value: impl Into<String>) -> Option<u16> {
        self.push(Constant::Utf8(value.into()))
    }

    /// Append an integer constant
    pub fn add_integer(&mut self, value: i32) -> Option<u16> {
        self.push(Constant::Integer(value))
    }

    /// Constant at `index`
    pub fn get(&self, index: u16) -> Option<&Constant> {
        self.entries.get(usize::from(index)).and_then(Option::as_ref)
    }

    /// Number of slots, including the unused slot 0
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no constant has been added
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    fn utf8(&self, index: u16) -> Result<&str, DecodeError> {
        match self.get(index) {
            Some(Constant::Utf8(s)) => Ok(s),
            _ => Err(DecodeError::BadConstant {
                index,
                expected: "utf8",
            }),
        }
    }

    fn integer(&self, index: u16) -> Result<i32, DecodeError> {
        match self.get(index) {
            Some(Constant::Integer(v)) => Ok(*v),
            _ => Err(DecodeError::BadConstant {
                index,
                expected: "integer",
            }),
        }
    }

    fn long(&self, index: u16) -> Result<i64, DecodeError> {
        match self.get(index) {
            Some(Constant::Long(v)) => Ok(*v),
            _ => Err(DecodeError::BadConstant {
                index,
                expected: "long",
            }),
        }
    }

    fn float(&self, index: u16) -> Result<f32, DecodeError> {
        match self.get(index) {
            Some(Constant::Float(v)) => Ok(*v),
            _ => Err(DecodeError::BadConstant {
                index,
                expected: "float",
            }),
        }
    }

    fn double(&self, index: u16) -> Result<f64, DecodeError> {
        match self.get(index) {
            Some(Constant::Double(v)) => Ok(*v),
            _ => Err(DecodeError::BadConstant {
                index,
                expected: "double",
            }),
        }
    }
}

/// Decode a `RuntimeVisibleAnnotations`-style body:
/// `u2 num_annotations` followed by that many `annotation` structures
pub fn decode_annotations(
    bytes: &[u8],
    pool: &ConstantPool,
) -> Result<Vec<AnnotationNode>, DecodeError> {
    let mut reader = AnnotationReader::new(bytes, pool);
    let count = reader.read_u16()?;
    let mut annotations = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        annotations.push(reader.read_annotation(0)?);
    }
    reader.finish()?;
    trace!(count = annotations.len(), "decoded annotations");
    Ok(annotations)
}

/// Decode exactly one `annotation` structure
pub fn decode_annotation(bytes: &[u8], pool: &ConstantPool) -> Result<AnnotationNode, DecodeError> {
    let mut reader = AnnotationReader::new(bytes, pool);
    let annotation = reader.read_annotation(0)?;
    reader.finish()?;
    Ok(annotation)
}

struct AnnotationReader<'a> {
    buffer: &'a [u8],
    position: usize,
    pool: &'a ConstantPool,
}

impl<'a> AnnotationReader<'a> {
    fn new(buffer: &'a [u8], pool: &'a ConstantPool) -> Self {
        Self {
            buffer,
            position: 0,
            pool,
        }
    }

    fn finish(&self) -> Result<(), DecodeError> {
        if self.position < self.buffer.len() {
            return Err(DecodeError::TrailingBytes(self.position));
        }
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let value = *self
            .buffer
            .get(self.position)
            .ok_or(DecodeError::UnexpectedEnd(self.position))?;
        self.position += 1;
        Ok(value)
    }

    // Class files are big-endian.
    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        if self.position + 2 > self.buffer.len() {
            return Err(DecodeError::UnexpectedEnd(self.position));
        }
        let bytes = [self.buffer[self.position], self.buffer[self.position + 1]];
        self.position += 2;
        Ok(u16::from_be_bytes(bytes))
    }

    fn read_utf8(&mut self) -> Result<String, DecodeError> {
        let index = self.read_u16()?;
        Ok(self.pool.utf8(index)?.to_string())
    }

    fn read_annotation(&mut self, depth: usize) -> Result<AnnotationNode, DecodeError> {
        let type_signature = self.read_utf8()?;
        let pair_count = self.read_u16()?;
        let mut attributes = IndexMap::with_capacity(usize::from(pair_count));
        for _ in 0..pair_count {
            let name = self.read_utf8()?;
            let value = self.read_element_value(depth)?;
            attributes.insert(name, value);
        }
        trace!(
            signature = type_signature.as_str(),
            attributes = attributes.len(),
            "decoded annotation"
        );
        Ok(AnnotationNode::Descriptor {
            type_signature,
            attributes,
        })
    }

    fn read_element_value(&mut self, depth: usize) -> Result<AttributeValue, DecodeError> {
        let offset = self.position;
        let tag = self.read_u8()?;
        let value = match tag {
            b'B' => AttributeValue::ByteConst(self.read_integer()? as i8),
            b'C' => AttributeValue::CharConst(self.read_integer()? as u16),
            b'I' => AttributeValue::IntConst(self.read_integer()?),
            b'S' => AttributeValue::ShortConst(self.read_integer()? as i16),
            b'Z' => AttributeValue::BoolConst(self.read_integer()? != 0),
            b'J' => {
                let index = self.read_u16()?;
                AttributeValue::LongConst(self.pool.long(index)?)
            }
            b'F' => {
                let index = self.read_u16()?;
                AttributeValue::FloatConst(self.pool.float(index)?)
            }
            b'D' => {
                let index = self.read_u16()?;
                AttributeValue::DoubleConst(self.pool.double(index)?)
            }
            b's' => AttributeValue::StringLiteral(self.read_utf8()?),
            b'e' => {
                let type_signature = self.read_utf8()?;
                let constant_name = self.read_utf8()?;
                AttributeValue::EnumConstant {
                    type_signature,
                    constant_name,
                }
            }
            b'c' => AttributeValue::ClassLiteral(self.read_utf8()?),
            b'@' => {
                let depth = self.nest(depth, offset)?;
                AttributeValue::NestedAnnotation(self.read_annotation(depth)?)
            }
            b'[' => {
                let depth = self.nest(depth, offset)?;
                let count = self.read_u16()?;
                let mut elements = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    elements.push(self.read_element_value(depth)?);
                }
                AttributeValue::try_array(elements)
                    .map_err(|source| DecodeError::ArrayShape { offset, source })?
            }
            tag => return Err(DecodeError::UnknownTag { tag, offset }),
        };
        Ok(value)
    }

    fn read_integer(&mut self) -> Result<i32, DecodeError> {
        let index = self.read_u16()?;
        self.pool.integer(index)
    }

    fn nest(&self, depth: usize, offset: usize) -> Result<usize, DecodeError> {
        if depth >= MAX_NESTING {
            return Err(DecodeError::TooDeep(offset));
        }
        Ok(depth + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_numbering() {
        let mut pool = ConstantPool::new();
        assert!(pool.is_empty());
        let long = pool.push(Constant::Long(7));
        let utf8 = pool.add_utf8("x");
        assert_eq!(long, Some(1));
        assert_eq!(utf8, Some(3));
        assert_eq!(pool.get(2), None);
        assert_eq!(pool.get(0), None);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn test_pool_stops_at_u2_limit() {
        let mut pool = ConstantPool::new();
        for value in 1..65534 {
            assert_eq!(pool.add_integer(value), Some(value as u16));
        }
        assert_eq!(pool.len(), 65534);

        // A wide constant would need slots 65534 and 65535.
        assert_eq!(pool.push(Constant::Double(1.0)), None);
        assert_eq!(pool.add_utf8("last"), Some(65534));
        assert_eq!(pool.add_integer(0), None);
        assert_eq!(pool.len(), 65535);
        assert_eq!(pool.get(65534), Some(&Constant::Utf8("last".to_string())));
    }

    #[test]
    fn test_reader_bounds_checking() {
        let pool = ConstantPool::new();
        let mut reader = AnnotationReader::new(&[0x01], &pool);
        assert_eq!(reader.read_u16(), Err(DecodeError::UnexpectedEnd(0)));
        assert_eq!(reader.read_u8(), Ok(0x01));
        assert_eq!(reader.read_u8(), Err(DecodeError::UnexpectedEnd(1)));
    }

    #[test]
    fn test_reader_is_big_endian() {
        let pool = ConstantPool::new();
        let mut reader = AnnotationReader::new(&[0x12, 0x34], &pool);
        assert_eq!(reader.read_u16(), Ok(0x1234));
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_wrong_constant_kind() {
        let mut pool = ConstantPool::new();
        let index = pool.add_integer(5).unwrap();
        assert_eq!(
            pool.utf8(index),
            Err(DecodeError::BadConstant {
                index,
                expected: "utf8",
            })
        );
    }

    #[test]
    fn test_unknown_tag_message() {
        let err = DecodeError::UnknownTag {
            tag: b'x',
            offset: 4,
        };
        assert_eq!(err.to_string(), "Unknown element value tag 0x78 at offset 4");
    }
}
