//! Name checks for strict descriptors

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

// `None` only if the pattern fails to compile, which rejects every name.
static QUALIFIED_NAME: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[\p{L}_$][\p{L}\p{N}_$]*(\.[\p{L}_$][\p{L}\p{N}_$]*)*$").ok()
});

static RESERVED: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
        "const", "continue", "default", "do", "double", "else", "enum", "extends", "final",
        "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
        "interface", "long", "native", "new", "package", "private", "protected", "public",
        "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
        "throw", "throws", "transient", "try", "void", "volatile", "while", "true", "false",
        "null", "_",
    ]
    .into_iter()
    .collect()
});

/// Dotted sequence of identifiers, none of them reserved
///
/// Used for module, service and provider names.
pub fn is_qualified_name(name: &str) -> bool {
    let well_formed = QUALIFIED_NAME
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(name));
    well_formed && name.split('.').all(|part| !RESERVED.contains(part))
}

/// Package names follow the same rules as qualified names
pub fn is_package_name(name: &str) -> bool {
    is_qualified_name(name)
}

/// Package part of a qualified class name, if it has one
pub(crate) fn package_of(class_name: &str) -> Option<&str> {
    class_name.rsplit_once('.').map(|(package, _)| package)
}
