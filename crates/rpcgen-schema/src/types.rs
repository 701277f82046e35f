//! Type expressions.
//!
//! ```text
//! Type     := Named | Array | Map
//! Named    := <base type> | <declared model name>
//! Array    := "[]" Type
//! Map      := "map[" BaseType "]" Type
//! ```

use crate::context::Context;
use crate::error::{Error, Result};
use crate::lexical::{is_base, is_reserved};
use std::fmt;
use std::str::FromStr;

/// One of the seven scalar types; the only types allowed as map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    String,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float32,
    Float64,
}

impl BaseType {
    pub const ALL: [BaseType; 7] = [
        BaseType::String,
        BaseType::Int32,
        BaseType::Int64,
        BaseType::Uint32,
        BaseType::Uint64,
        BaseType::Float32,
        BaseType::Float64,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BaseType::String => "string",
            BaseType::Int32 => "int32",
            BaseType::Int64 => "int64",
            BaseType::Uint32 => "uint32",
            BaseType::Uint64 => "uint64",
            BaseType::Float32 => "float32",
            BaseType::Float64 => "float64",
        }
    }
}

impl FromStr for BaseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BaseType::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| Error::NotBaseType(s.to_string()))
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnyType {
    /// A base type or a declared model, by name.
    Named(String),
    /// `[]T`
    Array(Box<AnyType>),
    /// `map[K]V`
    Map { from: BaseType, to: Box<AnyType> },
}

impl AnyType {
    pub fn named(name: impl Into<String>) -> Self {
        AnyType::Named(name.into())
    }

    pub fn array(of: AnyType) -> Self {
        AnyType::Array(Box::new(of))
    }

    pub fn map(from: BaseType, to: AnyType) -> Self {
        AnyType::Map {
            from,
            to: Box::new(to),
        }
    }
}

/// Renders the Go spelling, which is also the canonical input spelling.
impl fmt::Display for AnyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyType::Named(name) => f.write_str(name),
            AnyType::Array(of) => write!(f, "[]{of}"),
            AnyType::Map { from, to } => write!(f, "map[{from}]{to}"),
        }
    }
}

/// Parse a raw type string against the declared models in `ctx`.
pub fn parse_compound(raw: &str, ctx: &Context) -> Result<AnyType> {
    if is_reserved(raw) {
        return Err(Error::ReservedName(raw.to_string()));
    }
    if is_base(raw) || ctx.is_model(raw) {
        return Ok(AnyType::named(raw));
    }
    if raw.len() >= 3 && raw.starts_with("[]") {
        return Ok(AnyType::array(parse_compound(&raw[2..], ctx)?));
    }
    if raw.len() >= 7 && raw.starts_with("map") {
        // Keys are base types and never contain brackets, so the first
        // `]` closes the key even when the value type is itself a map.
        let (key, value) = raw[3..]
            .strip_prefix('[')
            .and_then(|r| r.split_once(']'))
            .ok_or_else(|| Error::MissingBracket(raw.to_string()))?;
        let from: BaseType = key.parse()?;
        let to = parse_compound(value, ctx)?;
        return Ok(AnyType::map(from, to));
    }
    Err(Error::UnparseableType(raw.to_string()))
}
