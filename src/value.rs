//! Opaque, reference-counted binary values.
//!
//! Corresponds to the datastore's reference-counted object handle (`robj`):
//! a byte sequence with an internal tag saying whether its in-memory form is
//! a raw buffer or a parsed integer. The core never interprets the payload
//! other than as bytes or, when hinted, a parsed integer.
//!
//! The refcount itself is not a field we maintain by hand: `Rc::clone` /
//! `Drop` already give exactly the increment-on-share / decrement-on-drop
//! contract the spec describes, so `RedisValue` is a thin `Rc<ValueData>`
//! newtype rather than a manual refcounted struct.

use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::rc::Rc;

/// The decoded form of a value: either an owned byte buffer or an integer
/// that was recognized as such on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueData {
    Bytes(Vec<u8>),
    Int(i64),
}

/// A refcounted handle to a [`ValueData`]. Cloning is O(1) (bumps the `Rc`
/// strong count); the value is freed when the last handle is dropped.
#[derive(Debug, Clone)]
pub struct RedisValue(Rc<ValueData>);

impl RedisValue {
    /// Build a value from raw bytes, opportunistically recognizing an
    /// integer encoding the same way the listpack encoder does, so that a
    /// value pushed in node-list form and later converted costs no more than
    /// one, and a value read back out always round-trips byte-for-byte.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match parse_strict_i64(bytes) {
            Some(n) => RedisValue(Rc::new(ValueData::Int(n))),
            None => RedisValue(Rc::new(ValueData::Bytes(bytes.to_vec()))),
        }
    }

    pub fn from_int(n: i64) -> Self {
        RedisValue(Rc::new(ValueData::Int(n)))
    }

    /// Wrap an already-decoded [`ValueData`] (e.g. from the listpack decoder,
    /// which has already done the integer-vs-string dispatch) without
    /// re-running `parse_strict_i64`.
    pub fn from_data(data: ValueData) -> Self {
        RedisValue(Rc::new(data))
    }

    pub fn data(&self) -> &ValueData {
        &self.0
    }

    /// Render the value as its canonical byte representation, allocating a
    /// fresh buffer for integers.
    pub fn to_bytes(&self) -> Vec<u8> {
        match &*self.0 {
            ValueData::Bytes(b) => b.clone(),
            ValueData::Int(n) => n.to_string().into_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        match &*self.0 {
            ValueData::Bytes(b) => b.len(),
            ValueData::Int(n) => {
                let mut len = n.unsigned_abs().to_string().len();
                if *n < 0 {
                    len += 1;
                }
                len
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live handles to this value, exposed for tests that assert
    /// the node-list free callback actually ran (count drops back to 1).
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl PartialEq for RedisValue {
    fn eq(&self, other: &Self) -> bool {
        match (&*self.0, &*other.0) {
            (ValueData::Int(a), ValueData::Int(b)) => a == b,
            _ => self.to_bytes() == other.to_bytes(),
        }
    }
}
impl Eq for RedisValue {}

impl fmt::Display for RedisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueData::Int(n) => write!(f, "{n}"),
            ValueData::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

/// Ordering used only for numeric LINSERT-adjacent comparisons in tests;
/// not part of the external contract.
impl PartialOrd for RedisValue {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        match (&*self.0, &*other.0) {
            (ValueData::Int(a), ValueData::Int(b)) => a.partial_cmp(b),
            _ => self.to_bytes().partial_cmp(&other.to_bytes()),
        }
    }
}

/// Parse `bytes` as a signed 64-bit decimal integer with no leading zeros
/// (other than the literal value `0`), no leading `+`, and no surrounding
/// whitespace — the same strict grammar the listpack encoder uses to decide
/// whether a pushed value qualifies for integer encoding. Returns `None` for
/// anything that would round-trip lossily (e.g. `"007"`, `"-0"`, `""`).
pub fn parse_strict_i64(bytes: &[u8]) -> Option<i64> {
    if bytes.is_empty() || bytes.len() >= 32 {
        return None;
    }
    let s = std::str::from_utf8(bytes).ok()?;
    let n: i64 = s.parse().ok()?;
    // Reject forms that wouldn't re-serialize to the same bytes (leading
    // zeros, "-0", stray "+"): round-trip and compare.
    if n.to_string().as_bytes() == bytes {
        Some(n)
    } else {
        None
    }
}
