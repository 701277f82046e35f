//! Lexical rules of the definition language.
//!
//! Identifiers end up verbatim in Go source, so Go keywords are off limits.
//! The `Params` suffix is reserved for the request structs the emitter
//! synthesizes per method.

/// Go keywords. Any of these used as a name would not compile.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "break",
    "default",
    "func",
    "interface",
    "select",
    "case",
    "defer",
    "go",
    "map",
    "struct",
    "chan",
    "else",
    "goto",
    "package",
    "switch",
    "const",
    "fallthrough",
    "if",
    "range",
    "type",
    "continue",
    "for",
    "import",
    "return",
    "var",
];

/// Suffix of the synthesized per-method request structs.
pub const RESERVED_SUFFIX: &str = "Params";

/// Scalar types the grammar treats as atomic.
pub const BASE_TYPES: &[&str] = &[
    "string", "int32", "int64", "uint32", "uint64", "float32", "float64",
];

/// The method key that carries the return type instead of a parameter.
pub const RETURN_KEY: &str = "return";

/// True if `s` is a keyword or ends with the reserved suffix.
pub fn is_reserved(s: &str) -> bool {
    RESERVED_KEYWORDS.contains(&s) || s.ends_with(RESERVED_SUFFIX)
}

/// True if `t` names one of the base types.
pub fn is_base(t: &str) -> bool {
    BASE_TYPES.contains(&t)
}

/// Upper-cases the first character of `s`, leaving the rest untouched.
///
/// Used both for exported Go member names and for the case-insensitive
/// duplicate check on field names. Characters whose upper-case form spans
/// several code points (e.g. `ß`) expand the same way in every locale.
pub fn capital_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
