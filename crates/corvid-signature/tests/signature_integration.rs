use corvid_signature::{
    parse_type_signature, BaseType, SignatureError, SignatureParser, TypeArgument, TypeSignature,
};

#[test]
fn test_parameterized_inner_class() {
    let text = "Ljava/util/Map<Ljava/lang/String;TV;>.Entry<*>;";
    let sig = parse_type_signature(text).unwrap();

    let TypeSignature::Class(class) = &sig else {
        panic!("expected class signature");
    };
    assert_eq!(class.path.len(), 2);
    assert_eq!(class.path[0].name, "java/util/Map");
    assert_eq!(class.path[0].type_arguments.len(), 2);
    assert_eq!(
        class.path[0].type_arguments[1],
        TypeArgument::Exact(TypeSignature::TypeVariable("V".to_string()))
    );
    assert_eq!(class.path[1].name, "Entry");
    assert_eq!(class.path[1].type_arguments, vec![TypeArgument::Unbounded]);
    assert_eq!(class.binary_name(), "java.util.Map$Entry");
    assert!(class.is_parameterized());
}

#[test]
fn test_wildcard_bounds() {
    let sig = parse_type_signature("Ljava/lang/Class<+Ljava/lang/Number;>;").unwrap();
    let TypeSignature::Class(class) = sig else {
        panic!("expected class signature");
    };
    match &class.path[0].type_arguments[0] {
        TypeArgument::Extends(TypeSignature::Class(bound)) => {
            assert_eq!(bound.binary_name(), "java.lang.Number");
        }
        other => panic!("unexpected argument {:?}", other),
    }

    let sig = parse_type_signature("Ljava/util/List<-TT;>;").unwrap();
    let TypeSignature::Class(class) = sig else {
        panic!("expected class signature");
    };
    assert_eq!(
        class.path[0].type_arguments[0],
        TypeArgument::Super(TypeSignature::TypeVariable("T".to_string()))
    );
}

#[test]
fn test_display_reproduces_source() {
    for text in [
        "I",
        "V",
        "[[J",
        "TElement;",
        "Lpkg/Marker;",
        "[Lpkg/Kind;",
        "Ljava/util/Map<Ljava/lang/String;[I>.Entry<*>;",
        "Ljava/util/List<+Ljava/lang/Number;>;",
    ] {
        let sig = parse_type_signature(text).unwrap();
        assert_eq!(sig.to_string(), text);
    }
}

#[test]
fn test_array_of_generic_class() {
    let sig = parse_type_signature("[Ljava/util/List<Ljava/lang/String;>;").unwrap();
    assert_eq!(sig.dimensions(), 1);
    let TypeSignature::Array(component) = sig else {
        panic!("expected array");
    };
    assert!(matches!(*component, TypeSignature::Class(_)));
}

#[test]
fn test_base_type_not_allowed_as_type_argument() {
    let err = parse_type_signature("Ljava/util/List<I>;").unwrap_err();
    assert_eq!(
        err,
        SignatureError::UnexpectedChar {
            found: 'I',
            offset: 16,
            expected: "type signature",
        }
    );
}

#[test]
fn test_parser_reports_position() {
    let mut parser = SignatureParser::new("[Z");
    let sig = parser.parse_type_sig().unwrap();
    assert_eq!(sig, TypeSignature::Array(Box::new(TypeSignature::Base(BaseType::Boolean))));
    assert_eq!(parser.position(), 2);
}

#[test]
fn test_error_messages() {
    let err = parse_type_signature("Lpkg/Marker").unwrap_err();
    assert_eq!(err.to_string(), "Unexpected end of signature at offset 11");

    let err = parse_type_signature("Q").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected character 'Q' at offset 0, expected type signature"
    );
}
