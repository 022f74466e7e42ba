//! Typed Value Conversion
//!
//! Coerces literal text to the primitive type a process declares for it.
//! Conversion is permissive: an unknown type tag, or text that does not
//! parse as the declared type, yields the raw text unchanged. New primitive
//! types on a server must never break parsing of an existing document.

use std::fmt;

use serde::Serialize;

/// A literal value coerced to its declared primitive type.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Text kept as-is (unknown type tag or unparsable value)
    Text(String),
}

const STRING_TYPES: &[&str] = &["string", "normalizedString", "token"];

const INTEGER_TYPES: &[&str] = &[
    "integer",
    "int",
    "long",
    "short",
    "byte",
    "nonNegativeInteger",
    "positiveInteger",
    "negativeInteger",
    "nonPositiveInteger",
    "unsignedInt",
    "unsignedLong",
    "unsignedShort",
];

const FLOAT_TYPES: &[&str] = &["float", "double", "decimal"];

/// Strips an XML Schema prefix (`xs:integer`) or URI fragment (`...#integer`).
pub fn normalize_type_tag(tag: &str) -> &str {
    let tag = tag.trim();
    tag.rsplit([':', '#']).next().unwrap_or(tag)
}

/// Converts `text` to the primitive type named by `type_tag`.
///
/// # Example
///
/// ```
/// use wpsclient::model::typed::{convert, TypedValue};
///
/// assert_eq!(convert("xs:integer", "42"), TypedValue::Integer(42));
/// assert_eq!(convert("anyURI", "http://x"), TypedValue::Text("http://x".into()));
/// ```
pub fn convert(type_tag: &str, text: &str) -> TypedValue {
    let tag = normalize_type_tag(type_tag);

    if STRING_TYPES.contains(&tag) {
        return TypedValue::String(text.to_string());
    }

    if INTEGER_TYPES.contains(&tag) {
        if let Ok(value) = text.parse::<i64>() {
            return TypedValue::Integer(value);
        }
    } else if FLOAT_TYPES.contains(&tag) {
        if let Ok(value) = text.parse::<f64>() {
            return TypedValue::Float(value);
        }
    } else if tag == "boolean" {
        match text {
            "true" => return TypedValue::Boolean(true),
            "false" => return TypedValue::Boolean(false),
            _ => {}
        }
    }

    TypedValue::Text(text.to_string())
}

impl TypedValue {
    /// Returns the value as a string slice if it is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Text(s) => write!(f, "{}", s),
            Self::Integer(i) => write!(f, "{}", i),
            // Debug keeps the fractional part ("2.0", not "2")
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_string_types() {
        assert_eq!(convert("string", "COMMA"), TypedValue::String("COMMA".to_string()));
        assert_eq!(convert("xs:token", "a"), TypedValue::String("a".to_string()));
    }

    #[test]
    fn test_convert_integer_types() {
        assert_eq!(convert("integer", "-7"), TypedValue::Integer(-7));
        assert_eq!(convert("long", "9000000000"), TypedValue::Integer(9_000_000_000));
        assert_eq!(convert("xs:int", "3"), TypedValue::Integer(3));
    }

    #[test]
    fn test_convert_float_types() {
        assert_eq!(convert("double", "1.5"), TypedValue::Float(1.5));
        assert_eq!(convert("float", "2.0"), TypedValue::Float(2.0));
    }

    #[test]
    fn test_convert_boolean() {
        assert_eq!(convert("boolean", "true"), TypedValue::Boolean(true));
        assert_eq!(convert("xs:boolean", "false"), TypedValue::Boolean(false));
    }

    #[test]
    fn test_convert_unknown_tag_is_passthrough() {
        assert_eq!(
            convert("dateTime", "2011-10-13T12:00:00Z"),
            TypedValue::Text("2011-10-13T12:00:00Z".to_string())
        );
    }

    #[test]
    fn test_convert_unparsable_is_passthrough() {
        assert_eq!(convert("integer", "abc"), TypedValue::Text("abc".to_string()));
        assert_eq!(convert("boolean", "maybe"), TypedValue::Text("maybe".to_string()));
    }

    #[test]
    fn test_uri_style_tag() {
        assert_eq!(
            convert("http://www.w3.org/TR/xmlschema-2/#integer", "5"),
            TypedValue::Integer(5)
        );
    }

    #[test]
    fn test_canonical_text_roundtrip() {
        let cases = [
            ("string", "SPACE"),
            ("integer", "42"),
            ("integer", "-3"),
            ("double", "1.5"),
            ("float", "2.0"),
            ("double", "-0.25"),
            ("boolean", "true"),
            ("boolean", "false"),
            ("anyURI", "dods://host/path"),
        ];

        for (tag, text) in cases {
            assert_eq!(convert(tag, text).to_string(), text, "tag {}", tag);
        }
    }
}
