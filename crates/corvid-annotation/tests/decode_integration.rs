//! Integration tests for class-file annotation decoding

use std::sync::Arc;

use corvid_annotation::{
    decode_annotation, decode_annotations, AnnotationNode, AnnotationRuntime, ArrayShapeError,
    AttributeValue, Constant, ConstantPool, DecodeError,
};
use corvid_reflect::{BaseType, ClassInfo, ClassRegistry, ElementType, RuntimeValue};

/// Byte buffer builder for annotation structures
#[derive(Default)]
struct Bytes(Vec<u8>);

impl Bytes {
    fn u1(mut self, value: u8) -> Self {
        self.0.push(value);
        self
    }

    fn u2(mut self, value: u16) -> Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn tagged(self, tag: u8, index: u16) -> Self {
        self.u1(tag).u2(index)
    }

    fn build(self) -> Vec<u8> {
        self.0
    }
}

#[test]
fn test_decode_marker() {
    let mut pool = ConstantPool::new();
    let marker = pool.add_utf8("Lpkg/Marker;").unwrap();

    let bytes = Bytes::default().u2(marker).u2(0).build();
    let node = decode_annotation(&bytes, &pool).unwrap();
    assert_eq!(
        node,
        AnnotationNode::descriptor("Lpkg/Marker;", Vec::<(&str, AttributeValue)>::new())
    );
}

#[test]
fn test_decode_every_constant_kind() {
    let mut pool = ConstantPool::new();
    let ty = pool.add_utf8("Lpkg/All;").unwrap();
    let names: Vec<u16> = ["b", "c", "i", "s", "z", "j", "f", "d", "str"]
        .iter()
        .map(|name| pool.add_utf8(*name).unwrap())
        .collect();
    let byte = pool.add_integer(-1).unwrap();
    let ch = pool.add_integer(0x41).unwrap();
    let int = pool.add_integer(7).unwrap();
    let short = pool.add_integer(300).unwrap();
    let boolean = pool.add_integer(1).unwrap();
    let long = pool.push(Constant::Long(1 << 40)).unwrap();
    let float = pool.push(Constant::Float(1.5)).unwrap();
    let double = pool.push(Constant::Double(-2.25)).unwrap();
    let text = pool.add_utf8("hello").unwrap();

    let bytes = Bytes::default()
        .u2(ty)
        .u2(9)
        .u2(names[0])
        .tagged(b'B', byte)
        .u2(names[1])
        .tagged(b'C', ch)
        .u2(names[2])
        .tagged(b'I', int)
        .u2(names[3])
        .tagged(b'S', short)
        .u2(names[4])
        .tagged(b'Z', boolean)
        .u2(names[5])
        .tagged(b'J', long)
        .u2(names[6])
        .tagged(b'F', float)
        .u2(names[7])
        .tagged(b'D', double)
        .u2(names[8])
        .tagged(b's', text)
        .build();

    let node = decode_annotation(&bytes, &pool).unwrap();
    let expected = AnnotationNode::descriptor(
        "Lpkg/All;",
        [
            ("b", AttributeValue::byte(-1)),
            ("c", AttributeValue::char(0x41)),
            ("i", AttributeValue::int(7)),
            ("s", AttributeValue::short(300)),
            ("z", AttributeValue::boolean(true)),
            ("j", AttributeValue::long(1 << 40)),
            ("f", AttributeValue::float(1.5)),
            ("d", AttributeValue::double(-2.25)),
            ("str", AttributeValue::string("hello")),
        ],
    );
    assert_eq!(node, expected);
    let order: Vec<_> = node.attributes().unwrap().keys().cloned().collect();
    assert_eq!(order, vec!["b", "c", "i", "s", "z", "j", "f", "d", "str"]);
}

#[test]
fn test_decode_enum_class_nested_and_array() {
    let mut pool = ConstantPool::new();
    let wrapper = pool.add_utf8("Lpkg/Wrapper;").unwrap();
    let marker = pool.add_utf8("Lpkg/Marker;").unwrap();
    let kind = pool.add_utf8("Lpkg/Kind;").unwrap();
    let fast = pool.add_utf8("FAST").unwrap();
    let slow = pool.add_utf8("SLOW").unwrap();
    let string = pool.add_utf8("Ljava/lang/String;").unwrap();
    let inner = pool.add_utf8("inner").unwrap();
    let kinds = pool.add_utf8("kinds").unwrap();
    let type_name = pool.add_utf8("type").unwrap();

    let bytes = Bytes::default()
        .u2(wrapper)
        .u2(3)
        .u2(inner)
        .u1(b'@')
        .u2(marker)
        .u2(0)
        .u2(kinds)
        .u1(b'[')
        .u2(2)
        .u1(b'e')
        .u2(kind)
        .u2(fast)
        .u1(b'e')
        .u2(kind)
        .u2(slow)
        .u2(type_name)
        .tagged(b'c', string)
        .build();

    let node = decode_annotation(&bytes, &pool).unwrap();
    let expected = AnnotationNode::descriptor(
        "Lpkg/Wrapper;",
        [
            (
                "inner",
                AttributeValue::annotation(AnnotationNode::descriptor(
                    "Lpkg/Marker;",
                    Vec::<(&str, AttributeValue)>::new(),
                )),
            ),
            (
                "kinds",
                AttributeValue::array(vec![
                    AttributeValue::enumeration("Lpkg/Kind;", "FAST"),
                    AttributeValue::enumeration("Lpkg/Kind;", "SLOW"),
                ]),
            ),
            ("type", AttributeValue::class("Ljava/lang/String;")),
        ],
    );
    assert_eq!(node, expected);
}

#[test]
fn test_decode_annotation_list() {
    let mut pool = ConstantPool::new();
    let first = pool.add_utf8("Lpkg/First;").unwrap();
    let second = pool.add_utf8("Lpkg/Second;").unwrap();

    let bytes = Bytes::default()
        .u2(2)
        .u2(first)
        .u2(0)
        .u2(second)
        .u2(0)
        .build();
    let nodes = decode_annotations(&bytes, &pool).unwrap();
    let signatures: Vec<_> = nodes.iter().filter_map(AnnotationNode::type_signature).collect();
    assert_eq!(signatures, vec!["Lpkg/First;", "Lpkg/Second;"]);

    assert_eq!(decode_annotations(&[0, 0], &pool), Ok(Vec::new()));
}

#[test]
fn test_heterogeneous_array_rejected() {
    let mut pool = ConstantPool::new();
    let ty = pool.add_utf8("Lpkg/Listy;").unwrap();
    let items = pool.add_utf8("items").unwrap();
    let text = pool.add_utf8("a").unwrap();
    let one = pool.add_integer(1).unwrap();

    let bytes = Bytes::default()
        .u2(ty)
        .u2(1)
        .u2(items)
        .u1(b'[')
        .u2(2)
        .tagged(b's', text)
        .tagged(b'I', one)
        .build();
    assert_eq!(
        decode_annotation(&bytes, &pool),
        Err(DecodeError::ArrayShape {
            offset: 6,
            source: ArrayShapeError::Heterogeneous {
                index: 1,
                expected: "string".to_string(),
                found: "int".to_string(),
            },
        })
    );
}

#[test]
fn test_nested_array_rejected() {
    let mut pool = ConstantPool::new();
    let ty = pool.add_utf8("Lpkg/Grid;").unwrap();
    let rows = pool.add_utf8("rows").unwrap();

    let bytes = Bytes::default()
        .u2(ty)
        .u2(1)
        .u2(rows)
        .u1(b'[')
        .u2(1)
        .u1(b'[')
        .u2(0)
        .build();
    assert!(matches!(
        decode_annotation(&bytes, &pool),
        Err(DecodeError::ArrayShape {
            source: ArrayShapeError::NestedArray { index: 0 },
            ..
        })
    ));
}

#[test]
fn test_malformed_input() {
    let mut pool = ConstantPool::new();
    let ty = pool.add_utf8("Lpkg/Sized;").unwrap();
    let value = pool.add_utf8("value").unwrap();
    let int = pool.add_integer(4).unwrap();

    // Truncated inside the element count
    assert_eq!(
        decode_annotation(&[0, 1, 0], &pool),
        Err(DecodeError::UnexpectedEnd(2))
    );

    // Unknown tag
    let bytes = Bytes::default().u2(ty).u2(1).u2(value).tagged(b'x', int).build();
    assert_eq!(
        decode_annotation(&bytes, &pool),
        Err(DecodeError::UnknownTag { tag: b'x', offset: 6 })
    );

    // Integer tag pointing at a utf8 constant
    let bytes = Bytes::default().u2(ty).u2(1).u2(value).tagged(b'I', value).build();
    assert_eq!(
        decode_annotation(&bytes, &pool),
        Err(DecodeError::BadConstant {
            index: value,
            expected: "integer",
        })
    );

    // Index past the pool
    let bytes = Bytes::default().u2(99).u2(0).build();
    assert_eq!(
        decode_annotation(&bytes, &pool),
        Err(DecodeError::BadConstant {
            index: 99,
            expected: "utf8",
        })
    );

    // Extra bytes after the structure
    let bytes = Bytes::default().u2(ty).u2(0).u1(0).build();
    assert_eq!(
        decode_annotation(&bytes, &pool),
        Err(DecodeError::TrailingBytes(4))
    );
}

#[test]
fn test_runaway_nesting_rejected() {
    let mut pool = ConstantPool::new();
    let ty = pool.add_utf8("Lpkg/Deep;").unwrap();
    let name = pool.add_utf8("next").unwrap();

    let mut bytes = Bytes::default().u2(ty).u2(1);
    for _ in 0..300 {
        bytes = bytes.u2(name).u1(b'@').u2(ty).u2(1);
    }
    assert!(matches!(
        decode_annotation(&bytes.build(), &pool),
        Err(DecodeError::TooDeep(_))
    ));
}

#[test]
fn test_decoded_tree_materializes() {
    let registry = ClassRegistry::with_core_classes();
    registry.register(ClassInfo::class("app.Caller"));
    registry.register(
        ClassInfo::annotation("pkg.Sized").element("value", ElementType::Primitive(BaseType::Int)),
    );
    let runtime = AnnotationRuntime::new(Arc::new(registry));
    let caller = runtime.registry().lookup("app.Caller").unwrap();

    let mut pool = ConstantPool::new();
    let ty = pool.add_utf8("Lpkg/Sized;").unwrap();
    let value = pool.add_utf8("value").unwrap();
    let int = pool.add_integer(42).unwrap();
    let bytes = Bytes::default().u2(ty).u2(1).u2(value).tagged(b'I', int).build();

    let node = decode_annotation(&bytes, &pool).unwrap();
    let annotation = runtime.materialize(&node, &caller).unwrap();
    assert_eq!(annotation.get("value"), Some(&RuntimeValue::Int(42)));
}
