//! Typed attributes, domains, tuples and primary keys.
//!
//! A [`Schema`] is an ordered sequence of named, typed attributes together
//! with a non-empty primary key. A tuple is a positionally aligned sequence
//! of [`Value`]s; [`Schema::check`] validates the alignment and
//! [`Schema::key_of`] projects the primary-key columns into a [`KeyValue`]
//! suitable for either index kind.
//!
//! [`Schema`]: struct.Schema.html
//! [`Value`]: enum.Value.html
//! [`Schema::check`]: struct.Schema.html#method.check
//! [`Schema::key_of`]: struct.Schema.html#method.key_of
//! [`KeyValue`]: struct.KeyValue.html

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use crate::{Error, Result};

/// Fixed byte width of the string domain. Shorter values are NUL-padded by
/// the codec; longer values are rejected by [`Schema::check`].
///
/// [`Schema::check`]: struct.Schema.html#method.check
pub const STRING_WIDTH: usize = 64;

/// The closed set of attribute domains.
///
/// Integers are stored big-endian, reals as little-endian IEEE-754 bit
/// patterns, characters as a single byte and strings as [`STRING_WIDTH`]
/// NUL-padded bytes (see the [`codec`] module).
///
/// [`STRING_WIDTH`]: constant.STRING_WIDTH.html
/// [`codec`]: ../codec/index.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// 32-bit IEEE-754 float.
    F32,
    /// 64-bit IEEE-754 float.
    F64,
    /// Single character, stored as one byte.
    Char,
    /// Fixed-width string of at most [`STRING_WIDTH`] bytes.
    ///
    /// [`STRING_WIDTH`]: constant.STRING_WIDTH.html
    Str,
}

impl Domain {
    /// Returns the fixed byte width of a packed value of this domain.
    pub fn width(self) -> usize {
        match self {
            Domain::I8 | Domain::Char => 1,
            Domain::I16 => 2,
            Domain::I32 | Domain::F32 => 4,
            Domain::I64 | Domain::F64 => 8,
            Domain::Str => STRING_WIDTH,
        }
    }

    /// Returns `true` for the integer domains.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Domain::I8 | Domain::I16 | Domain::I32 | Domain::I64
        )
    }

    /// Returns `true` for the floating-point domains.
    pub fn is_real(self) -> bool {
        matches!(self, Domain::F32 | Domain::F64)
    }

    /// Parses a literal token into a value of this domain.
    ///
    /// This is the parser used by the selection predicate evaluator; string
    /// tokens arrive with their quotes already stripped. Returns `None` when
    /// the token does not denote a value of the domain.
    pub fn parse(self, token: &str) -> Option<Value> {
        match self {
            Domain::I8 => token.parse().ok().map(Value::I8),
            Domain::I16 => token.parse().ok().map(Value::I16),
            Domain::I32 => token.parse().ok().map(Value::I32),
            Domain::I64 => token.parse().ok().map(Value::I64),
            Domain::F32 => token.parse().ok().map(Value::F32),
            Domain::F64 => token.parse().ok().map(Value::F64),
            Domain::Char => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Char(c)),
                    _ => None,
                }
            }
            Domain::Str => {
                if token.len() <= STRING_WIDTH {
                    Some(Value::Str(token.to_owned()))
                } else {
                    None
                }
            }
        }
    }
}

/// A single scalar of one of the supported domains.
///
/// Values are totally ordered and hashable so that primary keys with real
/// domains can live in either index kind: floats compare via `total_cmp`
/// and hash their IEEE-754 bit patterns. Values of different domains order
/// by domain tag; within a schema that case never arises.
#[derive(Debug, Clone)]
pub enum Value {
    /// An `i8` value.
    I8(i8),
    /// An `i16` value.
    I16(i16),
    /// An `i32` value.
    I32(i32),
    /// An `i64` value.
    I64(i64),
    /// An `f32` value.
    F32(f32),
    /// An `f64` value.
    F64(f64),
    /// A `char` value.
    Char(char),
    /// A string value of at most [`STRING_WIDTH`] bytes.
    ///
    /// [`STRING_WIDTH`]: constant.STRING_WIDTH.html
    Str(String),
}

impl Value {
    /// Returns the domain this value belongs to.
    pub fn domain(&self) -> Domain {
        match self {
            Value::I8(_) => Domain::I8,
            Value::I16(_) => Domain::I16,
            Value::I32(_) => Domain::I32,
            Value::I64(_) => Domain::I64,
            Value::F32(_) => Domain::F32,
            Value::F64(_) => Domain::F64,
            Value::Char(_) => Domain::Char,
            Value::Str(_) => Domain::Str,
        }
    }

    /// Compares two values of the same domain; `None` when the domains
    /// differ.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        if self.domain() == other.domain() {
            Some(self.cmp(other))
        } else {
            None
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::I8(_) => 0,
            Value::I16(_) => 1,
            Value::I32(_) => 2,
            Value::I64(_) => 3,
            Value::F32(_) => 4,
            Value::F64(_) => 5,
            Value::Char(_) => 6,
            Value::Str(_) => 7,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::I8(a), Value::I8(b)) => a.cmp(b),
            (Value::I16(a), Value::I16(b)) => a.cmp(b),
            (Value::I32(a), Value::I32(b)) => a.cmp(b),
            (Value::I64(a), Value::I64(b)) => a.cmp(b),
            (Value::F32(a), Value::F32(b)) => a.total_cmp(b),
            (Value::F64(a), Value::F64(b)) => a.total_cmp(b),
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::I8(v) => v.hash(state),
            Value::I16(v) => v.hash(state),
            Value::I32(v) => v.hash(state),
            Value::I64(v) => v.hash(state),
            Value::F32(v) => v.to_bits().hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::Char(v) => v.hash(state),
            Value::Str(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", v),
        }
    }
}

/// A tuple: one value per schema attribute, positionally aligned.
pub type Tuple = Vec<Value>;

/// The projection of a tuple onto the primary-key columns.
///
/// Most keys span one or two columns, so the values are kept inline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyValue(pub SmallVec<[Value; 2]>);

impl KeyValue {
    /// Builds a key value from its column values.
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self(values.into_iter().collect())
    }
}

/// A named, typed attribute of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, unique within its schema.
    pub name: String,
    /// Attribute domain.
    pub domain: Domain,
}

impl Attribute {
    /// Creates a new attribute.
    pub fn new(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
        }
    }
}

/// An ordered sequence of attributes plus a non-empty primary key.
///
/// Attribute names are unique within a schema; the primary key is an ordered
/// subset of the attribute names. Both properties are validated by
/// [`Schema::new`].
///
/// [`Schema::new`]: #method.new
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<Attribute>,
    key: Vec<String>,
}

impl Schema {
    /// Creates a schema from `(name, domain)` pairs and the primary-key
    /// attribute names.
    ///
    /// Fails with a domain-mismatch kind on duplicate attribute names or an
    /// empty key, and with an unknown-attribute kind when a key name is not
    /// among the attributes.
    pub fn new(columns: &[(&str, Domain)], key: &[&str]) -> Result<Self> {
        let attributes: Vec<_> = columns
            .iter()
            .map(|&(name, domain)| Attribute::new(name, domain))
            .collect();
        Self::from_attributes(attributes, key)
    }

    /// Creates a schema from already-built attributes; see [`new`](#method.new).
    pub fn from_attributes(attributes: Vec<Attribute>, key: &[&str]) -> Result<Self> {
        for (i, attribute) in attributes.iter().enumerate() {
            if attributes[..i].iter().any(|a| a.name == attribute.name) {
                return Err(Error::DomainMismatch(format!(
                    "duplicate attribute `{}`",
                    attribute.name
                )));
            }
        }
        if key.is_empty() {
            return Err(Error::DomainMismatch(
                "the primary key must name at least one attribute".to_owned(),
            ));
        }
        for name in key {
            if !attributes.iter().any(|a| a.name == *name) {
                return Err(Error::UnknownAttribute((*name).to_owned()));
            }
        }
        Ok(Self {
            attributes,
            key: key.iter().map(|&name| name.to_owned()).collect(),
        })
    }

    /// Returns the attributes in schema order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the primary-key attribute names in key order.
    pub fn key(&self) -> &[String] {
        &self.key
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` when the schema has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns the position of the named attribute.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    /// Returns the domain of the named attribute.
    pub fn domain(&self, name: &str) -> Option<Domain> {
        self.position(name).map(|i| self.attributes[i].domain)
    }

    /// Returns the positions of the primary-key columns, in key order.
    pub fn key_positions(&self) -> SmallVec<[usize; 2]> {
        self.key
            .iter()
            .filter_map(|name| self.position(name))
            .collect()
    }

    /// Returns the packed byte width of one tuple of this schema.
    pub fn row_width(&self) -> usize {
        self.attributes.iter().map(|a| a.domain.width()).sum()
    }

    /// Validates a tuple against the schema: the arity, every positional
    /// domain, and the string-width limit.
    pub fn check(&self, tuple: &[Value]) -> Result<()> {
        if tuple.len() != self.attributes.len() {
            return Err(Error::DomainMismatch(format!(
                "expected {} values, got {}",
                self.attributes.len(),
                tuple.len()
            )));
        }
        for (attribute, value) in self.attributes.iter().zip(tuple) {
            if value.domain() != attribute.domain {
                return Err(Error::DomainMismatch(format!(
                    "attribute `{}` expects {:?}, got {:?}",
                    attribute.name,
                    attribute.domain,
                    value.domain()
                )));
            }
            if let Value::Str(s) = value {
                if s.len() > STRING_WIDTH {
                    return Err(Error::DomainMismatch(format!(
                        "string for attribute `{}` exceeds {} bytes",
                        attribute.name, STRING_WIDTH
                    )));
                }
            }
        }
        Ok(())
    }

    /// Projects a tuple onto the primary-key columns.
    ///
    /// The tuple is assumed to have passed [`check`](#method.check).
    pub fn key_of(&self, tuple: &[Value]) -> KeyValue {
        KeyValue(
            self.key_positions()
                .iter()
                .map(|&i| tuple[i].clone())
                .collect(),
        )
    }

    /// Builds the schema of a projection onto the named attributes.
    ///
    /// The projected schema keeps the original primary key when all of its
    /// columns are retained; otherwise every projected attribute becomes
    /// part of the key.
    pub fn project(&self, names: &[&str]) -> Result<Self> {
        let mut attributes = Vec::with_capacity(names.len());
        for &name in names {
            let position = self
                .position(name)
                .ok_or_else(|| Error::UnknownAttribute(name.to_owned()))?;
            attributes.push(self.attributes[position].clone());
        }
        let key_retained = self
            .key
            .iter()
            .all(|k| names.iter().any(|&n| n == k.as_str()));
        let key: Vec<&str> = if key_retained {
            self.key.iter().map(String::as_str).collect()
        } else {
            names.to_vec()
        };
        Self::from_attributes(attributes, &key)
    }
}
