//! Typed scalar values carried by leaves and content-match nodes.
//!
//! The set of kinds is closed and mirrors the YANG built-in types a subtree
//! filter can compare against. Every kind has a canonical lexical form
//! (`Display`) and a parser for the XML lexical space (`Value::parse`).

use crate::name::QName;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use core::fmt;
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarKind {
    Boolean,
    Binary,
    Decimal,
    Enumeration,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    String,
    Bits,
    IdentityRef,
    InstanceIdentifier,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Boolean => "boolean",
            ScalarKind::Binary => "binary",
            ScalarKind::Decimal => "decimal64",
            ScalarKind::Enumeration => "enumeration",
            ScalarKind::Int8 => "int8",
            ScalarKind::Int16 => "int16",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint8 => "uint8",
            ScalarKind::Uint16 => "uint16",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::String => "string",
            ScalarKind::Bits => "bits",
            ScalarKind::IdentityRef => "identityref",
            ScalarKind::InstanceIdentifier => "instance-identifier",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid {kind} value '{text}'")]
    Invalid { kind: ScalarKind, text: String },
    #[error("{kind} value '{text}' out of range")]
    OutOfRange { kind: ScalarKind, text: String },
}

impl ValueError {
    fn invalid(kind: ScalarKind, text: &str) -> Self {
        ValueError::Invalid { kind, text: text.to_owned() }
    }
}

/// Fixed-point decimal normalised to the smallest scale that represents it,
/// so `1.50` and `1.5` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal {
    unscaled: i128,
    scale: u8,
}

impl Decimal {
    /// YANG decimal64 allows at most 18 fraction digits.
    pub const MAX_SCALE: u8 = 18;

    pub fn new(unscaled: i128, scale: u8) -> Self {
        let mut decimal = Self { unscaled, scale };
        while decimal.scale > 0 && decimal.unscaled % 10 == 0 {
            decimal.unscaled /= 10;
            decimal.scale -= 1;
        }
        decimal
    }

    pub fn unscaled(&self) -> i128 {
        self.unscaled
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }
}

impl FromStr for Decimal {
    type Err = ValueError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(ValueError::invalid(ScalarKind::Decimal, text));
        }
        if body.ends_with('.') {
            return Err(ValueError::invalid(ScalarKind::Decimal, text));
        }
        let scale = u8::try_from(frac_part.len())
            .ok()
            .filter(|scale| *scale <= Decimal::MAX_SCALE)
            .ok_or_else(|| ValueError::OutOfRange {
                kind: ScalarKind::Decimal,
                text: text.to_owned(),
            })?;

        let mut unscaled: i128 = 0;
        for digit in int_part.bytes().chain(frac_part.bytes()) {
            unscaled = unscaled
                .checked_mul(10)
                .and_then(|v| v.checked_add(i128::from(digit - b'0')))
                .ok_or_else(|| ValueError::OutOfRange {
                    kind: ScalarKind::Decimal,
                    text: text.to_owned(),
                })?;
        }
        if negative {
            unscaled = -unscaled;
        }
        Ok(Decimal::new(unscaled, scale))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let digits = self.unscaled.unsigned_abs().to_string();
        let scale = usize::from(self.scale);
        if scale == 0 {
            return write!(f, "{sign}{digits}.0");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

/// A typed scalar.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Boolean(bool),
    Binary(Vec<u8>),
    Decimal(Decimal),
    Enumeration(String),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    String(String),
    Bits(BTreeSet<String>),
    /// Identity resolved to its defining namespace. XML text names it with a
    /// prefix, which is resolved when the text is read.
    IdentityRef(QName),
    InstanceIdentifier(String),
}

fn parse_int<T: FromStr>(kind: ScalarKind, text: &str) -> Result<T, ValueError> {
    let trimmed = text.trim();
    trimmed.parse::<T>().map_err(|_| {
        // Distinguish syntactically valid integers that do not fit the width.
        if i128::from_str(trimmed).is_ok() {
            ValueError::OutOfRange { kind, text: text.to_owned() }
        } else {
            ValueError::invalid(kind, text)
        }
    })
}

/// Parses `{namespace}local` or a bare `local`. Prefixed names need the XML
/// bindings in scope and are resolved by the reader instead.
fn parse_expanded_name(text: &str) -> Result<QName, ValueError> {
    let trimmed = text.trim();
    let (namespace, local) = match trimmed.strip_prefix('{').and_then(|rest| rest.split_once('}')) {
        Some((namespace, local)) if !namespace.is_empty() => (Some(namespace), local),
        Some(_) => return Err(ValueError::invalid(ScalarKind::IdentityRef, text)),
        None => (None, trimmed),
    };
    if local.is_empty() || local.contains([':', '{', '}']) || local.contains(char::is_whitespace) {
        return Err(ValueError::invalid(ScalarKind::IdentityRef, text));
    }
    Ok(match namespace {
        Some(namespace) => QName::new(namespace, local),
        None => QName::unqualified(local),
    })
}

impl Value {
    /// Parses `text` in the XML lexical space of `kind`.
    pub fn parse(kind: ScalarKind, text: &str) -> Result<Value, ValueError> {
        Ok(match kind {
            ScalarKind::Boolean => match text.trim() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => return Err(ValueError::invalid(kind, text)),
            },
            ScalarKind::Binary => {
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                Value::Binary(STANDARD.decode(compact).map_err(|_| ValueError::invalid(kind, text))?)
            }
            ScalarKind::Decimal => Value::Decimal(text.parse()?),
            ScalarKind::Enumeration => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ValueError::invalid(kind, text));
                }
                Value::Enumeration(trimmed.to_owned())
            }
            ScalarKind::Int8 => Value::Int8(parse_int(kind, text)?),
            ScalarKind::Int16 => Value::Int16(parse_int(kind, text)?),
            ScalarKind::Int32 => Value::Int32(parse_int(kind, text)?),
            ScalarKind::Int64 => Value::Int64(parse_int(kind, text)?),
            ScalarKind::Uint8 => Value::Uint8(parse_int(kind, text)?),
            ScalarKind::Uint16 => Value::Uint16(parse_int(kind, text)?),
            ScalarKind::Uint32 => Value::Uint32(parse_int(kind, text)?),
            ScalarKind::Uint64 => Value::Uint64(parse_int(kind, text)?),
            ScalarKind::String => Value::String(text.to_owned()),
            ScalarKind::Bits => Value::Bits(text.split_whitespace().map(str::to_owned).collect()),
            ScalarKind::IdentityRef => Value::IdentityRef(parse_expanded_name(text)?),
            ScalarKind::InstanceIdentifier => Value::InstanceIdentifier(text.trim().to_owned()),
        })
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            Value::Boolean(_) => ScalarKind::Boolean,
            Value::Binary(_) => ScalarKind::Binary,
            Value::Decimal(_) => ScalarKind::Decimal,
            Value::Enumeration(_) => ScalarKind::Enumeration,
            Value::Int8(_) => ScalarKind::Int8,
            Value::Int16(_) => ScalarKind::Int16,
            Value::Int32(_) => ScalarKind::Int32,
            Value::Int64(_) => ScalarKind::Int64,
            Value::Uint8(_) => ScalarKind::Uint8,
            Value::Uint16(_) => ScalarKind::Uint16,
            Value::Uint32(_) => ScalarKind::Uint32,
            Value::Uint64(_) => ScalarKind::Uint64,
            Value::String(_) => ScalarKind::String,
            Value::Bits(_) => ScalarKind::Bits,
            Value::IdentityRef(_) => ScalarKind::IdentityRef,
            Value::InstanceIdentifier(_) => ScalarKind::InstanceIdentifier,
        }
    }

    /// Re-interprets this value as `kind` through its lexical form.
    pub fn coerce(&self, kind: ScalarKind) -> Result<Value, ValueError> {
        if self.kind() == kind {
            return Ok(self.clone());
        }
        Value::parse(kind, &self.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Binary(bytes) => f.write_str(&STANDARD.encode(bytes)),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Uint8(v) => write!(f, "{v}"),
            Value::Uint16(v) => write!(f, "{v}"),
            Value::Uint32(v) => write!(f, "{v}"),
            Value::Uint64(v) => write!(f, "{v}"),
            Value::IdentityRef(name) => write!(f, "{name}"),
            Value::Enumeration(v) | Value::String(v) | Value::InstanceIdentifier(v) => {
                f.write_str(v)
            }
            Value::Bits(bits) => {
                let mut first = true;
                for bit in bits {
                    if !first {
                        f.write_str(" ")?;
                    }
                    f.write_str(bit)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<QName> for Value {
    fn from(value: QName) -> Self {
        Value::IdentityRef(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

macro_rules! value_from_int {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        })*
    };
}

value_from_int!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
);
